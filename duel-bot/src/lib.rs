//! The aiming agent for the gravity artillery duel.
//!
//! Builds on the `duel-core` engine: the solver and scanner invert the
//! trajectory simulator to find launch parameters, the protocol/net modules
//! speak the game server's wire format, and the bot module ties both into
//! the turn loop.

pub mod bot;
pub mod fixture;
pub mod net;
pub mod protocol;
pub mod scanner;
pub mod solver;
pub mod strategy;
