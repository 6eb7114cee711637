//! The aiming solver: inverts the trajectory simulator by treating it as a
//! black-box objective over (compass angle, energy).
//!
//! The objective is the closest approach of the simulated path to the
//! target, clamped to exactly zero once it falls inside the accept
//! tolerance. The clamp turns every good-enough shot into the same flat
//! basin, which keeps local minimizers from polishing a hit they already
//! have.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use duel_core::constants::{ENERGY_BOUND, INITIAL_ENERGY, PLAYER_HITBOX_SCALE};
use duel_core::geometry::{compass_bearing, compass_to_launch};
use duel_core::sim::{simulate, Aim, FlightOutcome, SimulationConfig};
use duel_core::{Field, Vec2};

use crate::strategy::{AimStrategy, SearchBox};

/// Default objective-evaluation budget for one seeded minimization.
pub const DEFAULT_BUDGET: usize = 200;

/// Search box: full compass circle, server-scaled energy.
fn search_box() -> SearchBox {
    SearchBox {
        min: [0.0, 0.0],
        max: [360.0, ENERGY_BOUND],
    }
}

/// Why a solve could not even start. Search non-convergence is *not* an
/// error; a sub-optimal [`Solution`] reports its achieved objective instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AimError {
    /// The launcher id is not present in the field.
    UnknownLauncher(u32),
    /// The field holds no player besides the launcher.
    NoOpponents,
    /// The requested target is the launcher itself.
    TargetIsLauncher(u32),
    /// The requested target id is not present in the field.
    UnknownTarget(u32),
}

impl fmt::Display for AimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLauncher(id) => write!(f, "launcher {id} is not on the field"),
            Self::NoOpponents => write!(f, "no opponent available to aim at"),
            Self::TargetIsLauncher(id) => write!(f, "target {id} is the launcher"),
            Self::UnknownTarget(id) => write!(f, "target {id} is not on the field"),
        }
    }
}

impl std::error::Error for AimError {}

/// Best launch parameters found from one or more seeds.
#[derive(Clone, Debug, Serialize)]
pub struct Solution {
    pub strategy: String,
    /// Compass-space angle (0 deg = up, clockwise).
    pub angle: f64,
    /// The same angle in the wire/simulator convention.
    pub launch_angle: f64,
    pub energy: f64,
    /// Achieved clamped objective; exactly 0.0 means an accepted hit.
    pub objective: f64,
    pub hit: bool,
    pub outcome: FlightOutcome,
    pub evaluations: usize,
    pub path_len: usize,
    /// Path of the winning flight, for relay or display. Excluded from the
    /// serialized form; `path_len` stands in for it.
    #[serde(skip)]
    pub path: Vec<Vec2>,
}

/// Clamped aiming objective for one launch parameter pair.
pub fn objective(
    config: &SimulationConfig,
    field: &Field,
    launcher_id: u32,
    origin: Vec2,
    target: Vec2,
    x: [f64; 2],
) -> f64 {
    let flight = simulate(config, field, launcher_id, origin, Aim::from_compass(x[0], x[1]));
    clamp_to_basin(config, flight.closest_approach(target))
}

/// The accept tolerance is deliberately wider than the simulator's strict
/// collision radius: the un-scaled player radius.
pub fn hit_tolerance(config: &SimulationConfig) -> f64 {
    config.player_size / PLAYER_HITBOX_SCALE
}

fn clamp_to_basin(config: &SimulationConfig, distance: f64) -> f64 {
    if distance < hit_tolerance(config) {
        0.0
    } else {
        distance
    }
}

/// Solve toward a raw field position. No target validation; the position
/// does not need to coincide with any player.
pub fn solve_at(
    config: &SimulationConfig,
    field: &Field,
    launcher_id: u32,
    origin: Vec2,
    target: Vec2,
    strategy: &dyn AimStrategy,
    budget: usize,
) -> Solution {
    let seed_angle = compass_bearing(origin, target);
    solve_seeded(
        config, field, launcher_id, origin, target, seed_angle, strategy, budget,
    )
}

fn solve_seeded(
    config: &SimulationConfig,
    field: &Field,
    launcher_id: u32,
    origin: Vec2,
    target: Vec2,
    seed_angle: f64,
    strategy: &dyn AimStrategy,
    budget: usize,
) -> Solution {
    let mut eval = |x: [f64; 2]| objective(config, field, launcher_id, origin, target, x);
    let minimum = strategy.minimize(
        &mut eval,
        [seed_angle, INITIAL_ENERGY],
        search_box(),
        budget,
    );

    let [angle, energy] = minimum.x;
    let flight = simulate(
        config,
        field,
        launcher_id,
        origin,
        Aim::from_compass(angle, energy),
    );
    Solution {
        strategy: strategy.id().to_string(),
        angle,
        launch_angle: compass_to_launch(angle),
        energy,
        objective: minimum.value,
        hit: minimum.value == 0.0,
        outcome: flight.outcome,
        evaluations: minimum.evaluations,
        path_len: flight.path.len(),
        path: flight.path,
    }
}

/// Solve against a target player, with the full cannot-solve taxonomy.
pub fn solve_player(
    config: &SimulationConfig,
    field: &Field,
    launcher_id: u32,
    target_id: u32,
    strategy: &dyn AimStrategy,
    budget: usize,
) -> Result<Solution, AimError> {
    let (origin, target) = validate(field, launcher_id, target_id)?;
    Ok(solve_at(
        config, field, launcher_id, origin, target, strategy, budget,
    ))
}

/// Multi-seed solve: `seeds` bearings spread evenly around the compass from
/// the straight-line guess, each minimized independently (and in parallel),
/// keeping the lowest achieved objective. Seeds are independent flights
/// over a shared read-only field, so the fan-out is embarrassingly
/// parallel.
pub fn solve_player_spread(
    config: &SimulationConfig,
    field: &Field,
    launcher_id: u32,
    target_id: u32,
    strategy: &dyn AimStrategy,
    budget: usize,
    seeds: usize,
) -> Result<Solution, AimError> {
    let (origin, target) = validate(field, launcher_id, target_id)?;
    let seeds = seeds.max(1);
    let bearing = compass_bearing(origin, target);

    let best = (0..seeds)
        .into_par_iter()
        .map(|i| {
            let seed_angle = (bearing + 360.0 * i as f64 / seeds as f64).rem_euclid(360.0);
            solve_seeded(
                config, field, launcher_id, origin, target, seed_angle, strategy, budget,
            )
        })
        .min_by(|a, b| a.objective.total_cmp(&b.objective))
        .expect("at least one seed");
    Ok(best)
}

fn validate(field: &Field, launcher_id: u32, target_id: u32) -> Result<(Vec2, Vec2), AimError> {
    let launcher = field
        .player(launcher_id)
        .ok_or(AimError::UnknownLauncher(launcher_id))?;
    if field.opponents(launcher_id).next().is_none() {
        return Err(AimError::NoOpponents);
    }
    if target_id == launcher_id {
        return Err(AimError::TargetIsLauncher(target_id));
    }
    let target = field
        .player(target_id)
        .ok_or(AimError::UnknownTarget(target_id))?;
    Ok((launcher.position, target.position))
}
