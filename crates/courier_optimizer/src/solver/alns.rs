use fxhash::FxHashSet;
use jiff::Timestamp;
use rand::{rngs::SmallRng, Rng};
use tracing::{debug, info};

use crate::{error::ConfigError, problem::instance::ProblemInstance};

use super::{
    noise::{CostNoiser, NoiseMode},
    recreate::{
        recreate_context::RecreateContext, recreate_solution::RecreateSolution,
        recreate_strategy::RecreateStrategy,
    },
    ruin::{ruin_context::RuinContext, ruin_solution::RuinSolution, ruin_strategy::RuinStrategy},
    solution::working_solution::Solution,
    weights::OperatorWeights,
};

/// The accepted-fingerprint set is a duplicate filter, not correctness
/// state; it is cleared wholesale at this size to bound memory.
const ACCEPTED_SET_CAPACITY: usize = 25_000;
const MIN_TEMPERATURE: f64 = 1e-10;

/// Per-call search options. The iteration budget is an explicit argument so
/// callers never mutate shared parameters to change it.
#[derive(Debug, Clone)]
pub struct AlnsOptions {
    pub iterations: usize,
    /// Let repair operators keep inserting past the destroy quota.
    pub insert_unlimited: bool,
    /// Return as soon as the best solution has an empty request bank.
    pub stop_when_all_assigned: bool,
}

impl AlnsOptions {
    /// Cost refinement over a fixed budget.
    pub fn refinement(iterations: usize) -> Self {
        AlnsOptions {
            iterations,
            insert_unlimited: false,
            stop_when_all_assigned: false,
        }
    }

    /// Short burst that tries to drain the request bank, used by the
    /// two-stage shrink phase.
    pub fn drain_bank(iterations: usize) -> Self {
        AlnsOptions {
            iterations,
            insert_unlimited: true,
            stop_when_all_assigned: true,
        }
    }
}

pub struct AlnsResult {
    pub best: Solution,
    pub iterations: usize,
}

/// Adaptive large neighborhood search: destroy a piece of the incumbent,
/// repair it, and steer both operator portfolios by their observed rewards,
/// under simulated-annealing acceptance.
pub struct Alns<'a> {
    instance: &'a ProblemInstance,
}

impl<'a> Alns<'a> {
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Alns { instance }
    }

    pub fn run(
        &self,
        initial: &Solution,
        options: &AlnsOptions,
        rng: &mut SmallRng,
    ) -> Result<AlnsResult, ConfigError> {
        let params = self.instance.params();
        params.validate()?;

        let requests_num = self.instance.requests().len();
        let q_hi = params
            .remove_upper_bound
            .min((params.epsilon * requests_num as f64) as usize);
        let q_lo = params.remove_lower_bound;
        if q_hi < q_lo {
            return Err(ConfigError::RemovalBounds {
                lower: q_lo,
                upper: q_hi,
            });
        }

        // Warm-start temperature: a solution `w` fraction worse than the
        // start is accepted with probability `annealing_p` at T0.
        let start_objective = initial.objective_sans_bank(self.instance);
        if start_objective <= 0.0 {
            return Err(ConfigError::ZeroStartObjective {
                objective: start_objective,
            });
        }
        let mut temperature = -(params.w * start_objective) / params.annealing_p.ln();

        let mut ruin_weights = OperatorWeights::new(RuinStrategy::all(), params.initial_weight);
        let mut recreate_weights = OperatorWeights::new(
            RecreateStrategy::portfolio(initial.fleet_size()),
            params.initial_weight,
        );
        let mut noise_weights = OperatorWeights::new(
            vec![NoiseMode::Plain, NoiseMode::Noised],
            params.initial_weight,
        );

        let mut best = initial.clone();
        let mut best_objective = best.objective(self.instance);
        let mut current = initial.clone();
        let mut current_objective = best_objective;

        let mut accepted_fingerprints: FxHashSet<u64> = FxHashSet::default();

        let started_at = Timestamp::now();
        info!(
            iterations = options.iterations,
            q_lo, q_hi, "starting adaptive search"
        );

        let rewards = params.reward_adds;
        let mut iteration = 0;
        while iteration < options.iterations {
            let q = rng.random_range(q_lo..=q_hi);

            let ruin_index = ruin_weights.select(rng);
            let recreate_index = recreate_weights.select(rng);
            let noise_index = noise_weights.select(rng);

            let mut candidate = current.clone();
            ruin_weights.strategy(ruin_index).ruin_solution(
                &mut candidate,
                RuinContext {
                    instance: self.instance,
                    rng: &mut *rng,
                    num_requests_to_remove: q,
                },
            );
            let noiser = CostNoiser::new(
                noise_weights.strategy(noise_index),
                params.eta,
                self.instance.max_distance(),
            );
            recreate_weights.strategy(recreate_index).recreate_solution(
                &mut candidate,
                RecreateContext {
                    instance: self.instance,
                    rng: &mut *rng,
                    noiser,
                    quota: q,
                    insert_unlimited: options.insert_unlimited,
                },
            );

            // A configuration that was already accepted once brings no new
            // information; drop it before any acceptance bookkeeping.
            let fingerprint = candidate.fingerprint();
            if accepted_fingerprints.contains(&fingerprint) {
                iteration += 1;
                continue;
            }

            let candidate_objective = candidate.objective(self.instance);

            let is_new_best = candidate_objective < best_objective;
            if is_new_best {
                ruin_weights.credit(ruin_index, rewards[0]);
                recreate_weights.credit(recreate_index, rewards[0]);
                noise_weights.credit(noise_index, rewards[0]);
            }

            // Strict source semantics: an exactly equal objective counts as
            // improving, which can loop on cost ties; the fingerprint filter
            // above is what breaks those loops.
            let mut is_accepted = false;
            if candidate_objective <= current_objective {
                is_accepted = true;
                if !is_new_best {
                    ruin_weights.credit(ruin_index, rewards[1]);
                    recreate_weights.credit(recreate_index, rewards[1]);
                    noise_weights.credit(noise_index, rewards[1]);
                }
            } else {
                let delta = candidate_objective - current_objective;
                let accept_probability = (-delta / temperature).exp();
                if rng.random_range(0.0..1.0) <= accept_probability {
                    is_accepted = true;
                    ruin_weights.credit(ruin_index, rewards[2]);
                    recreate_weights.credit(recreate_index, rewards[2]);
                    noise_weights.credit(noise_index, rewards[2]);
                }
            }

            if is_new_best {
                best = candidate.clone();
                best_objective = candidate_objective;
                debug!(
                    iteration,
                    objective = best_objective,
                    unassigned = best.request_bank().len(),
                    "new best solution"
                );
            }

            if is_accepted {
                current = candidate;
                current_objective = candidate_objective;

                accepted_fingerprints.insert(fingerprint);
                if accepted_fingerprints.len() > ACCEPTED_SET_CAPACITY {
                    accepted_fingerprints.clear();
                }
            }

            if (iteration + 1) % params.segment_num == 0 {
                ruin_weights.update_weights(params.r);
                recreate_weights.update_weights(params.r);
                noise_weights.update_weights(params.r);
            }

            temperature = (temperature * params.c_cool).max(MIN_TEMPERATURE);
            iteration += 1;

            if options.stop_when_all_assigned && best.request_bank().is_empty() {
                break;
            }
        }

        info!(
            iterations = iteration,
            objective = best_objective,
            unassigned = best.request_bank().len(),
            elapsed = %Timestamp::now().duration_since(started_at),
            "adaptive search finished"
        );

        Ok(AlnsResult {
            best,
            iterations: iteration,
        })
    }
}
