//! The trajectory simulator: advances one missile through one full flight
//! under multi-body Newtonian gravity and classifies how the flight ends.
//!
//! The integration scheme must match the game server bit for bit, so the
//! step structure is deliberately rigid: per planet, collision test before
//! the pull is accumulated; all pulls summed before the velocity is applied;
//! player hits tested against the candidate position; bounds and the segment
//! cap last.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ASPECT_H, ASPECT_W, BATTLEFIELD_H, BATTLEFIELD_W, BOUNDS_MARGIN, LEFT_SOURCE_SLACK,
    MAX_SEGMENTS, PLAYER_SIZE, SEGMENT_STEPS,
};
use crate::field::Field;
use crate::geometry::{compass_to_launch, Vec2};

/// Fixed-at-construction simulation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub battlefield_w: f64,
    pub battlefield_h: f64,
    /// Out-of-bounds tolerance beyond the field rectangle on every side.
    pub margin: f64,
    /// Player collision radius.
    pub player_size: f64,
    /// Sub-steps per simulated unit time.
    pub segment_steps: u32,
    /// Termination cap on recorded path positions.
    pub max_segments: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            battlefield_w: BATTLEFIELD_W,
            battlefield_h: BATTLEFIELD_H,
            margin: BOUNDS_MARGIN,
            player_size: PLAYER_SIZE,
            segment_steps: SEGMENT_STEPS,
            max_segments: MAX_SEGMENTS,
        }
    }
}

impl SimulationConfig {
    /// Derive field dimensions from a total area at the game's 16:9 aspect.
    pub fn from_area(area: f64) -> Self {
        Self {
            battlefield_w: (area * ASPECT_W / ASPECT_H).sqrt(),
            battlefield_h: (area * ASPECT_H / ASPECT_W).sqrt(),
            ..Self::default()
        }
    }

    fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= -self.margin
            && p.x <= self.battlefield_w + self.margin
            && p.y >= -self.margin
            && p.y <= self.battlefield_h + self.margin
    }
}

/// Launch parameters in the simulator's native convention: `angle` is the
/// launch angle in degrees (also the wire angle), giving the initial
/// velocity `energy * (cos a, -sin a)` in the y-down field space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub angle: f64,
    pub energy: f64,
}

impl Aim {
    pub fn new(angle: f64, energy: f64) -> Self {
        Self { angle, energy }
    }

    /// Build from a compass-space angle (0 deg = up, clockwise).
    pub fn from_compass(compass_deg: f64, energy: f64) -> Self {
        Self::new(compass_to_launch(compass_deg), energy)
    }

    pub fn velocity(self) -> Vec2 {
        let rad = self.angle.to_radians();
        Vec2::new(self.energy * rad.cos(), self.energy * -rad.sin())
    }
}

/// Terminal classification of a flight. Every simulated flight ends in
/// exactly one of these; there is no undetermined result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightOutcome {
    HitPlanet(u32),
    HitPlayer(u32),
    OutOfBounds,
    /// The segment cap fired. A safety fallback for captured orbits, not a
    /// physical outcome.
    OutOfSegments,
}

impl FlightOutcome {
    pub fn is_player_hit(self) -> bool {
        matches!(self, FlightOutcome::HitPlayer(_))
    }
}

/// A completed flight: how it ended plus every accepted position after the
/// launch point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub outcome: FlightOutcome,
    pub path: Vec<Vec2>,
}

impl Flight {
    /// Minimum distance from any path point to `target`. An empty path
    /// (immediate planet collision) is infinitely far from everything.
    pub fn closest_approach(&self, target: Vec2) -> f64 {
        self.path
            .iter()
            .map(|p| p.distance(target))
            .fold(f64::INFINITY, f64::min)
    }
}

// Transient missile state, scoped to one simulate() call.
struct Missile {
    position: Vec2,
    velocity: Vec2,
    // Set once the missile has moved PLAYER_SIZE + slack away from the
    // launcher; gates every player hit. Monotonic within a flight.
    left_source: bool,
}

/// Fly one missile to termination.
///
/// `launcher_id` is the player whose proximity controls `left_source`;
/// `origin` is the launch position (normally that player's position, kept
/// separate so hypothetical launches can be simulated). The field is never
/// mutated.
pub fn simulate(
    config: &SimulationConfig,
    field: &Field,
    launcher_id: u32,
    origin: Vec2,
    aim: Aim,
) -> Flight {
    let mut missile = Missile {
        position: origin,
        velocity: aim.velocity(),
        left_source: false,
    };
    let sub_steps = config.segment_steps as f64;
    let mut path: Vec<Vec2> = Vec::new();

    loop {
        // Gravity pass. The collision test runs before normalization so a
        // missile coincident with a planet center can never divide by zero.
        for planet in field.planets() {
            let to_planet = planet.position - missile.position;
            let distance = to_planet.norm();
            if distance <= planet.radius {
                return Flight {
                    outcome: FlightOutcome::HitPlanet(planet.id),
                    path,
                };
            }
            let pull = to_planet / distance * (planet.mass / (distance * distance));
            missile.velocity += pull / sub_steps;
        }

        let candidate = missile.position + missile.velocity / sub_steps;

        for player in field.players() {
            let distance = player.position.distance(candidate);
            if distance <= config.player_size && missile.left_source {
                return Flight {
                    outcome: FlightOutcome::HitPlayer(player.id),
                    path,
                };
            }
            if distance > config.player_size + LEFT_SOURCE_SLACK && player.id == launcher_id {
                missile.left_source = true;
            }
        }

        if !config.in_bounds(candidate) {
            return Flight {
                outcome: FlightOutcome::OutOfBounds,
                path,
            };
        }

        path.push(candidate);
        if path.len() >= config.max_segments {
            return Flight {
                outcome: FlightOutcome::OutOfSegments,
                path,
            };
        }
        missile.position = candidate;
    }
}

#[cfg(test)]
mod tests;
