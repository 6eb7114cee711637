//! Coordinate pattern search with step halving. Slower to converge than the
//! simplex but immune to its degenerate-collapse failure modes on the
//! objective's flat plateaus.

use super::{AimStrategy, Minimum, SearchBox};

pub struct CompassSearch {
    pub initial_step: [f64; 2],
    pub min_step: [f64; 2],
}

impl Default for CompassSearch {
    fn default() -> Self {
        Self {
            initial_step: [22.5, 2.5],
            min_step: [0.05, 0.01],
        }
    }
}

impl AimStrategy for CompassSearch {
    fn id(&self) -> &'static str {
        "compass"
    }

    fn description(&self) -> &'static str {
        "Coordinate pattern search with step halving"
    }

    fn minimize(
        &self,
        objective: &mut dyn FnMut([f64; 2]) -> f64,
        seed: [f64; 2],
        bounds: SearchBox,
        budget: usize,
    ) -> Minimum {
        let mut x = bounds.clamp(seed);
        let mut evaluations = 0usize;
        if budget == 0 {
            return Minimum {
                x,
                value: f64::INFINITY,
                evaluations,
            };
        }

        let mut fx = objective(x);
        evaluations += 1;
        if fx == 0.0 {
            return Minimum {
                x,
                value: fx,
                evaluations,
            };
        }

        let mut step = self.initial_step;
        while evaluations < budget
            && (step[0] >= self.min_step[0] || step[1] >= self.min_step[1])
        {
            let mut improved = false;
            for (axis, dir) in [(0, 1.0), (0, -1.0), (1, 1.0), (1, -1.0)] {
                if evaluations >= budget {
                    break;
                }
                let mut probe = x;
                probe[axis] += dir * step[axis];
                let probe = bounds.clamp(probe);
                if probe == x {
                    continue;
                }
                let fp = objective(probe);
                evaluations += 1;
                if fp == 0.0 {
                    return Minimum {
                        x: probe,
                        value: 0.0,
                        evaluations,
                    };
                }
                if fp < fx {
                    x = probe;
                    fx = fp;
                    improved = true;
                }
            }
            if !improved {
                step[0] *= 0.5;
                step[1] *= 0.5;
            }
        }

        Minimum {
            x,
            value: fx,
            evaluations,
        }
    }
}
