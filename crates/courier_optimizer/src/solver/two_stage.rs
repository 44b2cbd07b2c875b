use std::collections::VecDeque;

use jiff::Timestamp;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use crate::{
    error::{ConvergenceError, SolverError},
    problem::{instance::ProblemInstance, request::RequestId, vehicle::VehicleId},
};

use super::{
    alns::{Alns, AlnsOptions},
    solution::working_solution::Solution,
};

const MAX_GROWTH_ATTEMPTS: usize = 1000;

/// A finished two-stage run. The instance is returned alongside the solution
/// because the driver grows and shrinks the fleet while it works.
pub struct TwoStageResult {
    pub instance: ProblemInstance,
    pub solution: Solution,
}

/// Phase A: drain the request bank, cloning the reference vehicle whenever a
/// request fits nowhere. A request that still fails right after a vehicle was
/// added can never be placed, and the attempt cap bounds the loop.
/// Returns the number of attempts spent.
fn grow_fleet_until_feasible(
    instance: &mut ProblemInstance,
    solution: &mut Solution,
) -> Result<usize, ConvergenceError> {
    let mut queue: VecDeque<RequestId> = {
        let mut banked: Vec<RequestId> = solution.request_bank().iter().copied().collect();
        banked.sort_unstable();
        banked.into()
    };

    let mut attempts = 0;
    let mut vehicle_just_added = false;

    while let Some(request_id) = queue.pop_front() {
        attempts += 1;
        if attempts > MAX_GROWTH_ATTEMPTS {
            return Err(ConvergenceError::AttemptsExhausted(MAX_GROWTH_ATTEMPTS));
        }

        if solution.insert_optimal_into_any(instance, request_id) {
            vehicle_just_added = false;
        } else {
            if vehicle_just_added {
                return Err(ConvergenceError::StuckRequest(request_id.get()));
            }

            let vehicle_id = solution.add_clone_vehicle(instance);
            info!(request = %request_id, vehicle = %vehicle_id, "request fits nowhere, vehicle added");
            queue.push_back(request_id);
            vehicle_just_added = true;
        }
    }

    Ok(attempts)
}

/// Stage 1: reach feasibility by fleet growth, then shrink the fleet by
/// repeatedly deleting the highest-id vehicle and letting a short search
/// re-place its requests. The last fully-assigned state is kept as a
/// snapshot; shrinking stops when a short search cannot drain the bank, the
/// total budget `theta` runs out, or an inner search reports an error.
pub fn minimize_fleet(
    mut instance: ProblemInstance,
    mut solution: Solution,
    rng: &mut SmallRng,
) -> Result<TwoStageResult, SolverError> {
    instance.params().validate().map_err(SolverError::from)?;

    let attempts = grow_fleet_until_feasible(&mut instance, &mut solution)?;
    info!(
        vehicles = solution.routes().len(),
        attempts, "fleet growth reached a feasible assignment"
    );

    let mut snapshot = (instance.clone(), solution.clone());

    if solution.routes().is_empty() {
        let (instance, solution) = snapshot;
        return Ok(TwoStageResult { instance, solution });
    }

    // Idle vehicles hold no requests; drop them before shrinking.
    let banked: Vec<VehicleId> = {
        let mut ids: Vec<VehicleId> = solution.vehicle_bank().iter().copied().collect();
        ids.sort_unstable();
        ids
    };
    for vehicle_id in banked {
        solution.delete_vehicle_and_route(&mut instance, vehicle_id);
    }

    let theta = instance.params().theta;
    let tau = instance.params().tau;
    let mut total_iterations = attempts;

    while total_iterations <= theta {
        if solution.fleet_size() <= 1 {
            break;
        }
        let Some(victim) = solution.max_vehicle_id() else {
            break;
        };

        info!(
            total_iterations,
            vehicles = solution.routes().len(),
            deleting = %victim,
            "attempting to shrink the fleet"
        );
        solution.delete_vehicle_and_route(&mut instance, victim);

        let run = Alns::new(&instance).run(&solution, &AlnsOptions::drain_bank(tau), rng);
        match run {
            Ok(result) => {
                if result.best.request_bank().is_empty() {
                    solution = result.best;
                    snapshot = (instance.clone(), solution.clone());
                    total_iterations += result.iterations;
                } else {
                    info!(
                        unassigned = result.best.request_bank().len(),
                        "short search could not drain the bank, shrinking stops"
                    );
                    break;
                }
            }
            Err(error) => {
                warn!(%error, "inner search failed while shrinking, keeping the best snapshot");
                break;
            }
        }
    }

    let (instance, solution) = snapshot;
    Ok(TwoStageResult { instance, solution })
}

/// The full driver: minimize the fleet, then refine costs with the whole
/// iteration budget and no early stop.
pub fn two_stage_search(
    instance: ProblemInstance,
    solution: Solution,
    rng: &mut SmallRng,
) -> Result<TwoStageResult, SolverError> {
    let started_at = Timestamp::now();

    info!("stage 1: minimizing fleet size");
    let TwoStageResult { instance, solution } = minimize_fleet(instance, solution, rng)?;

    info!(vehicles = solution.routes().len(), "stage 2: refining costs");
    let refined = {
        let budget = instance.params().iteration_num;
        match Alns::new(&instance).run(&solution, &AlnsOptions::refinement(budget), rng) {
            Ok(result) => result.best,
            Err(error) => {
                warn!(%error, "refinement failed, returning the stage-1 solution");
                solution
            }
        }
    };

    info!(
        elapsed = %Timestamp::now().duration_since(started_at),
        "two-stage search finished"
    );

    Ok(TwoStageResult {
        instance,
        solution: refined,
    })
}
