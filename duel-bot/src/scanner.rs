//! Brute-force angle sweep: a non-optimizing diagnostic that walks a range
//! of compass angles at one fixed energy and reports the first angle whose
//! flight takes out an opponent. Useful for sanity-checking the simulator
//! against the solver, and as a last-resort fallback.

use tracing::debug;

use duel_core::sim::{simulate, Aim, FlightOutcome, SimulationConfig};
use duel_core::{Field, Vec2};

/// Half-open sweep `[start, stop)` in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl AngleRange {
    pub fn full_sweep(step: f64) -> Self {
        Self {
            start: 0.0,
            stop: 360.0,
            step,
        }
    }
}

/// First compass angle in the range whose flight ends in a hit on a player
/// other than the launcher, or `None` if the sweep finds nothing.
pub fn scan(
    config: &SimulationConfig,
    field: &Field,
    launcher_id: u32,
    origin: Vec2,
    range: AngleRange,
    energy: f64,
) -> Option<f64> {
    if range.step <= 0.0 {
        return None;
    }
    let mut angle = range.start;
    while angle < range.stop {
        let flight = simulate(
            config,
            field,
            launcher_id,
            origin,
            Aim::from_compass(angle, energy),
        );
        match flight.outcome {
            FlightOutcome::HitPlayer(id) if id != launcher_id => {
                debug!(angle, energy, hit = id, "sweep found a hitting angle");
                return Some(angle);
            }
            outcome => {
                debug!(angle, ?outcome, segments = flight.path.len(), "sweep miss");
            }
        }
        angle += range.step;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_step_finds_nothing() {
        let config = SimulationConfig::default();
        let mut field = Field::new();
        field.upsert_player(1, Vec2::new(500.0, 500.0));
        field.upsert_player(2, Vec2::new(600.0, 500.0));
        let origin = Vec2::new(500.0, 500.0);
        assert_eq!(
            scan(
                &config,
                &field,
                1,
                origin,
                AngleRange {
                    start: 0.0,
                    stop: 360.0,
                    step: 0.0
                },
                10.0
            ),
            None
        );
    }

    #[test]
    fn empty_field_sweep_is_none() {
        let config = SimulationConfig::default();
        let mut field = Field::new();
        field.upsert_player(1, Vec2::new(500.0, 500.0));
        assert_eq!(
            scan(
                &config,
                &field,
                1,
                Vec2::new(500.0, 500.0),
                AngleRange::full_sweep(15.0),
                10.0
            ),
            None
        );
    }
}
