use crate::{problem::request::RequestId, solver::solution::working_solution::Solution};

use super::{
    insertion_costs::{InsertionCosts, UNLIMITED},
    recreate_context::RecreateContext,
    recreate_solution::RecreateSolution,
};

/// Prefers the request that would suffer most from losing its best option:
/// `regret(r) = sum over the k cheapest vehicles of (cost - best cost)`.
pub struct RegretInsertion {
    k: usize,
}

impl RegretInsertion {
    pub fn new(k: usize) -> Self {
        assert!(k >= 2, "regret-k needs at least two alternatives, got {k}");
        RegretInsertion { k }
    }
}

impl RecreateSolution for RegretInsertion {
    fn recreate_solution(&self, solution: &mut Solution, mut context: RecreateContext<'_>) {
        let fleet_size = solution.fleet_size();
        assert!(
            self.k <= fleet_size,
            "regret horizon {} exceeds the fleet size {fleet_size}",
            self.k
        );

        let quota = context.quota.min(solution.request_bank().len());
        let iteration_cap = 2 * quota;

        let mut costs =
            InsertionCosts::build(context.instance, solution, &context.noiser, context.rng);

        let mut committed = 0;
        while (context.insert_unlimited || committed < quota) && committed < iteration_cap {
            if costs.is_empty() || solution.request_bank().is_empty() {
                break;
            }

            // Regret of every remaining request, most regretful first.
            let mut ranked: Vec<(RequestId, f64, f64, crate::problem::vehicle::VehicleId)> =
                Vec::new();
            for request_id in costs.requests_sorted() {
                let vehicle_costs = costs.sorted_vehicle_costs(request_id);
                assert!(
                    vehicle_costs.len() >= self.k,
                    "state violation: request {request_id} has {} vehicle entries, regret-{} \
                     needs at least {}",
                    vehicle_costs.len(),
                    self.k,
                    self.k
                );

                let (best_vehicle, best_cost) = vehicle_costs[0];
                let regret: f64 = vehicle_costs[..self.k]
                    .iter()
                    .map(|(_, cost)| cost - best_cost)
                    .sum();

                ranked.push((request_id, regret, best_cost, best_vehicle));
            }

            ranked.sort_unstable_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .expect("regret values are finite")
                    .then_with(|| a.0.cmp(&b.0))
            });

            let Some(&(request_id, _, _, vehicle_id)) =
                ranked.iter().find(|(_, _, best_cost, _)| *best_cost <= UNLIMITED)
            else {
                break;
            };

            let inserted =
                solution.insert_optimal_into_vehicle(context.instance, request_id, vehicle_id);
            assert!(
                inserted,
                "state violation: regret table offered request {request_id} on vehicle \
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
