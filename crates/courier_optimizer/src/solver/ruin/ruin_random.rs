use rand::{seq::index, Rng};

use crate::solver::solution::working_solution::Solution;

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Uniformly samples assigned requests without replacement.
pub struct RuinRandom;

impl RuinSolution for RuinRandom {
    fn ruin_solution<R>(&self, solution: &mut Solution, context: RuinContext<'_, R>)
    where
        R: Rng,
    {
        let assigned = solution.assigned_requests_sorted();
        if assigned.is_empty() {
            return;
        }

        let amount = context.num_requests_to_remove.min(assigned.len());
        let selected: Vec<_> = index::sample(context.rng, assigned.len(), amount)
            .iter()
            .map(|i| assigned[i])
            .collect();

        solution.remove_requests(context.instance, &selected);
    }
}
