//! Bounded Nelder-Mead simplex descent, the default aiming backend.

use super::{AimStrategy, Minimum, SearchBox};

const ALPHA: f64 = 1.0; // reflection
const GAMMA: f64 = 2.0; // expansion
const RHO: f64 = 0.5; // contraction
const SIGMA: f64 = 0.5; // shrink

pub struct NelderMead {
    /// Offsets of the two non-seed simplex vertices.
    pub initial_step: [f64; 2],
    /// Simplex spread below which the search is considered converged.
    pub tolerance: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            initial_step: [15.0, 2.5],
            tolerance: 1e-3,
        }
    }
}

fn along(from: [f64; 2], toward: [f64; 2], coef: f64) -> [f64; 2] {
    [
        from[0] + coef * (toward[0] - from[0]),
        from[1] + coef * (toward[1] - from[1]),
    ]
}

impl AimStrategy for NelderMead {
    fn id(&self) -> &'static str {
        "nelder-mead"
    }

    fn description(&self) -> &'static str {
        "Bounded Nelder-Mead simplex over (angle, energy)"
    }

    fn minimize(
        &self,
        objective: &mut dyn FnMut([f64; 2]) -> f64,
        seed: [f64; 2],
        bounds: SearchBox,
        budget: usize,
    ) -> Minimum {
        let seed = bounds.clamp(seed);
        let mut evaluations = 0usize;

        // Seed simplex: the guess plus one offset per axis, folded inward
        // when the offset would leave the box.
        let mut vertices = vec![seed];
        for axis in 0..2 {
            let mut v = seed;
            v[axis] += self.initial_step[axis];
            if v[axis] > bounds.max[axis] {
                v[axis] = seed[axis] - self.initial_step[axis];
            }
            vertices.push(bounds.clamp(v));
        }

        let mut simplex: Vec<([f64; 2], f64)> = Vec::with_capacity(3);
        for v in vertices {
            if evaluations >= budget {
                break;
            }
            let value = objective(v);
            evaluations += 1;
            if value == 0.0 {
                return Minimum {
                    x: v,
                    value,
                    evaluations,
                };
            }
            simplex.push((v, value));
        }
        if simplex.is_empty() {
            return Minimum {
                x: seed,
                value: f64::INFINITY,
                evaluations,
            };
        }
        while simplex.len() < 3 {
            simplex.push(simplex[0]);
        }

        loop {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            let spread = (0..2)
                .map(|i| (simplex[2].0[i] - simplex[0].0[i]).abs())
                .fold(0.0, f64::max);
            if evaluations >= budget || spread < self.tolerance {
                break;
            }

            let centroid = along(simplex[0].0, simplex[1].0, 0.5);
            let worst = simplex[2];

            let reflected = bounds.clamp(along(centroid, worst.0, -ALPHA));
            let fr = objective(reflected);
            evaluations += 1;
            if fr == 0.0 {
                return Minimum {
                    x: reflected,
                    value: 0.0,
                    evaluations,
                };
            }

            if fr < simplex[0].1 {
                if evaluations < budget {
                    let expanded = bounds.clamp(along(centroid, reflected, GAMMA));
                    let fe = objective(expanded);
                    evaluations += 1;
                    if fe == 0.0 {
                        return Minimum {
                            x: expanded,
                            value: 0.0,
                            evaluations,
                        };
                    }
                    simplex[2] = if fe < fr { (expanded, fe) } else { (reflected, fr) };
                } else {
                    simplex[2] = (reflected, fr);
                }
            } else if fr < simplex[1].1 {
                simplex[2] = (reflected, fr);
            } else {
                if evaluations >= budget {
                    break;
                }
                let contracted = bounds.clamp(along(centroid, worst.0, RHO));
                let fc = objective(contracted);
                evaluations += 1;
                if fc == 0.0 {
                    return Minimum {
                        x: contracted,
                        value: 0.0,
                        evaluations,
                    };
                }
                if fc < worst.1 {
                    simplex[2] = (contracted, fc);
                } else {
                    // Shrink everything toward the best vertex.
                    for i in 1..3 {
                        if evaluations >= budget {
                            break;
                        }
                        let x = bounds.clamp(along(simplex[0].0, simplex[i].0, SIGMA));
                        let value = objective(x);
                        evaluations += 1;
                        if value == 0.0 {
                            return Minimum {
                                x,
                                value,
                                evaluations,
                            };
                        }
                        simplex[i] = (x, value);
                    }
                }
            }
        }

        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        Minimum {
            x: simplex[0].0,
            value: simplex[0].1,
            evaluations,
        }
    }
}
