use rand::Rng;

use crate::solver::solution::working_solution::Solution;

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes requests whose removal saves the most, one at a time.
///
/// The savings of every assigned request are re-ranked after each removal;
/// batching the q picks would sample a different distribution over removal
/// sets, so the loop is deliberately one-by-one.
pub struct RuinWorst;

impl RuinSolution for RuinWorst {
    fn ruin_solution<R>(&self, solution: &mut Solution, context: RuinContext<'_, R>)
    where
        R: Rng,
    {
        let p_worst = context.instance.params().p_worst;

        for _ in 0..context.num_requests_to_remove {
            let mut candidates: Vec<_> = solution
                .assigned_requests_sorted()
                .into_iter()
                .map(|request_id| {
                    let savings = solution.cost_if_remove(context.instance, request_id);
                    (request_id, savings)
                })
                .collect();

            if candidates.is_empty() {
                break;
            }

            // Largest savings first; ties resolved by request id so the
            // ranking is reproducible.
            candidates.sort_unstable_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .expect("removal savings are finite")
                    .then_with(|| a.0.cmp(&b.0))
            });

            let y: f64 = context.rng.random_range(0.0..1.0);
            let index = ((y.powi(p_worst as i32) * candidates.len() as f64) as usize)
                .min(candidates.len() - 1);

            let selected = candidates[index].0;
            solution.remove_requests(context.instance, &[selected]);
        }
    }
}
