use rand::Rng;

use crate::solver::solution::working_solution::Solution;

use super::ruin_context::RuinContext;

pub trait RuinSolution {
    fn ruin_solution<R>(&self, solution: &mut Solution, context: RuinContext<'_, R>)
    where
        R: Rng;
}
