//! Deterministic trajectory engine for the gravity artillery duel.
//!
//! Pure computation only: no I/O, no clocks, no global state. The bot crate
//! feeds this engine field snapshots and launch parameters and classifies
//! the resulting flights.

pub mod constants;
pub mod field;
pub mod geometry;
pub mod sim;

pub use field::{Field, Planet, Player};
pub use geometry::Vec2;
pub use sim::{simulate, Aim, Flight, FlightOutcome, SimulationConfig};
