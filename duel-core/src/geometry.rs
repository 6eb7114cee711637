//! Plane geometry and unit conversions.
//!
//! The field uses screen conventions: x grows right, y grows down. Two angle
//! spaces coexist and both are in degrees:
//!
//! - *compass* angles are what the aiming device reports: 0 deg points up,
//!   positive turns clockwise;
//! - *launch* angles are what the wire and the simulator consume:
//!   `v = E * (cos a, -sin a)`.
//!
//! The two are mirror images of each other through `(90 - a) mod 360`.

use core::ops::{Add, AddAssign, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PLAYERS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).norm()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// Cartesian to polar: returns `(rho, phi)` with `phi` in radians.
pub fn cart2pol(v: Vec2) -> (f64, f64) {
    (v.norm(), v.y.atan2(v.x))
}

/// Polar to cartesian.
pub fn pol2cart(rho: f64, phi: f64) -> Vec2 {
    Vec2::new(rho * phi.cos(), rho * phi.sin())
}

/// Compass angle (0 deg = up, clockwise) to launch angle, degrees.
/// The mapping is its own inverse.
pub fn compass_to_launch(deg: f64) -> f64 {
    (90.0 - deg).rem_euclid(360.0)
}

/// Launch angle to compass angle, degrees.
pub fn launch_to_compass(deg: f64) -> f64 {
    (90.0 - deg).rem_euclid(360.0)
}

/// Compass bearing from `from` straight at `to`. This is the solver's
/// initial angle guess.
pub fn compass_bearing(from: Vec2, to: Vec2) -> f64 {
    let (_, phi) = cart2pol(to - from);
    (phi.to_degrees() + 90.0).rem_euclid(360.0)
}

/// HSV to RGB, all inputs in [0, 1].
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor() as u32 % 6;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ]
}

/// Display color for a player id: hues spaced around the wheel, shifted a
/// sixth of a turn every six players.
pub fn player_color(id: u32) -> [u8; 3] {
    let hue = 360.0 / MAX_PLAYERS.min(6) as f64 * id as f64 + (id / 6) as f64 * 30.0;
    hsv_to_rgb(hue / 360.0, 0.8, 1.0)
}
