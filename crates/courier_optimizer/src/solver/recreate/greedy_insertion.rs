use crate::solver::solution::working_solution::Solution;

use super::{
    insertion_costs::{InsertionCosts, UNLIMITED},
    recreate_context::RecreateContext,
    recreate_solution::RecreateSolution,
};

/// Repeatedly commits the globally cheapest feasible insertion.
pub struct GreedyInsertion;

impl RecreateSolution for GreedyInsertion {
    fn recreate_solution(&self, solution: &mut Solution, mut context: RecreateContext<'_>) {
        let quota = context.quota.min(solution.request_bank().len());
        let iteration_cap = 2 * quota;

        let mut costs =
            InsertionCosts::build(context.instance, solution, &context.noiser, context.rng);

        let mut committed = 0;
        while (context.insert_unlimited || committed < quota) && committed < iteration_cap {
            if costs.is_empty() || solution.request_bank().is_empty() {
                break;
            }

            let Some((request_id, vehicle_id, cost)) = costs.best() else {
                break;
            };
            if cost > UNLIMITED {
                break;
            }

            let inserted =
                solution.insert_optimal_into_vehicle(context.instance, request_id, vehicle_id);
            assert!(
                inserted,
                "state violation: cost table offered request {request_id} on vehicle \
                 {vehicle_id} but the insertion failed"
            );

            costs.remove_request(request_id);
            costs.refresh_vehicle_column(
                context.instance,
                solution,
                vehicle_id,
                &context.noiser,
                context.rng,
            );

            committed += 1;
        }
    }
}
