//! Field and simulation constants.
//!
//! Values mirror the authoritative game server; the simulator's predictions
//! are only useful while these match the server exactly.

// Battlefield
pub const BATTLEFIELD_AREA: f64 = 2.0e6;
pub const ASPECT_W: f64 = 16.0;
pub const ASPECT_H: f64 = 9.0;
/// Server-reported field dimensions. The 16:9 derivation of
/// `BATTLEFIELD_AREA` lands at 1885.6 x 1060.7; the live server truncates.
pub const BATTLEFIELD_W: f64 = 1885.0;
pub const BATTLEFIELD_H: f64 = 1060.0;
/// Extra out-of-bounds tolerance beyond the field rectangle.
pub const BOUNDS_MARGIN: f64 = 500.0;

// Players
pub const MAX_PLAYERS: u32 = 12;
pub const PLAYER_RADIUS: f64 = 4.0;
/// The server shrinks the visual radius for collision purposes.
pub const PLAYER_HITBOX_SCALE: f64 = 0.8;
/// Effective collision radius used by the step integrator.
pub const PLAYER_SIZE: f64 = PLAYER_RADIUS * PLAYER_HITBOX_SCALE;
/// Distance past `PLAYER_SIZE` at which a missile counts as having left its
/// launcher. Until then the launcher cannot be self-hit.
pub const LEFT_SOURCE_SLACK: f64 = 1.0;

// Integration
/// Velocity and gravity increments are divided into this many sub-steps per
/// simulated unit time.
pub const SEGMENT_STEPS: u32 = 25;
/// Hard cap on recorded path positions. Guarantees termination for orbits
/// that neither decay nor escape.
pub const MAX_SEGMENTS: usize = 4000;

// Launch energy
/// Server-enforced ceiling on shot power (interactive aiming range).
pub const MAX_SHOT_POWER: f64 = 50.0;
/// Upper edge of the solver's energy search box; matches the server's
/// effective velocity scale.
pub const ENERGY_BOUND: f64 = 20.0;
/// Energy component of every solver seed.
pub const INITIAL_ENERGY: f64 = 5.0;
