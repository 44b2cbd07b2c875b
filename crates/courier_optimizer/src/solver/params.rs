use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// All run parameters. Every field is range-validated by [`Params::validate`]
/// before a search starts; out-of-range values fail fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Distance weight in the objective.
    pub alpha: f64,
    /// Route-duration weight in the objective.
    pub beta: f64,
    /// Penalty per unassigned request.
    pub gama: f64,

    /// Shaw relatedness weights: distance, service-start time, load,
    /// compatible-vehicle overlap.
    pub shaw_distance_weight: f64,
    pub shaw_time_weight: f64,
    pub shaw_load_weight: f64,
    pub shaw_vehicle_weight: f64,

    /// Shaw selection exponent (higher is greedier).
    pub p: u32,
    /// Worst-removal selection exponent.
    pub p_worst: u32,

    /// Simulated-annealing warm start: a solution `w` fraction worse than the
    /// initial one is accepted with probability `annealing_p` at T0.
    pub w: f64,
    pub annealing_p: f64,
    /// Cooling rate applied every iteration.
    pub c_cool: f64,

    /// Operator weight mixing rate of the segment update.
    pub r: f64,
    /// Rewards for new-best / improving / accepted-diversifying iterations.
    pub reward_adds: [f64; 3],

    /// Insertion-cost noise amplitude, as a fraction of the largest pairwise
    /// distance.
    pub eta: f64,

    /// Starting weight of every operator.
    pub initial_weight: f64,

    /// ALNS iteration cap.
    pub iteration_num: usize,
    /// Maximum fraction of requests removed per iteration.
    pub epsilon: f64,
    /// Iterations between operator weight updates.
    pub segment_num: usize,

    /// Total ALNS iteration budget across the two-stage shrink phase.
    pub theta: usize,
    /// Per-shrink ALNS budget.
    pub tau: usize,

    pub remove_upper_bound: usize,
    pub remove_lower_bound: usize,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            alpha: 1.0,
            beta: 1e-6,
            gama: 1e9,

            shaw_distance_weight: 9.0,
            shaw_time_weight: 3.0,
            shaw_load_weight: 3.0,
            shaw_vehicle_weight: 5.0,

            p: 6,
            p_worst: 3,

            w: 0.05,
            annealing_p: 0.5,
            c_cool: 0.99975,

            r: 0.1,
            reward_adds: [10.0, 6.0, 3.0],

            eta: 0.025,

            initial_weight: 1.0,

            iteration_num: 25_000,
            epsilon: 0.4,
            segment_num: 50,

            theta: 25_000,
            tau: 2_000,

            remove_upper_bound: 100,
            remove_lower_bound: 4,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "> 0",
                })
            }
        }

        fn open_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 && value < 1.0 {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "in (0, 1)",
                })
            }
        }

        fn at_least_one(name: &'static str, value: usize) -> Result<(), ConfigError> {
            if value >= 1 {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    name,
                    value: value as f64,
                    expected: ">= 1",
                })
            }
        }

        positive("alpha", self.alpha)?;
        positive("beta", self.beta)?;
        positive("gama", self.gama)?;
        positive("initial_weight", self.initial_weight)?;

        at_least_one("p", self.p as usize)?;
        at_least_one("p_worst", self.p_worst as usize)?;

        open_unit("w", self.w)?;
        open_unit("annealing_p", self.annealing_p)?;
        open_unit("c_cool", self.c_cool)?;
        open_unit("r", self.r)?;
        open_unit("eta", self.eta)?;

        at_least_one("iteration_num", self.iteration_num)?;
        at_least_one("segment_num", self.segment_num)?;
        at_least_one("theta", self.theta)?;
        at_least_one("tau", self.tau)?;
        at_least_one("remove_upper_bound", self.remove_upper_bound)?;
        at_least_one("remove_lower_bound", self.remove_lower_bound)?;

        if self.epsilon <= 0.0 || self.epsilon > 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "epsilon",
                value: self.epsilon,
                expected: "in (0, 1]",
            });
        }

        if self.remove_upper_bound < self.remove_lower_bound {
            return Err(ConfigError::RemovalBounds {
                lower: self.remove_lower_bound,
                upper: self.remove_upper_bound,
            });
        }

        Ok(())
    }
}
