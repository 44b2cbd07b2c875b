use crate::solver::solution::working_solution::Solution;

use super::recreate_context::RecreateContext;

pub trait RecreateSolution {
    fn recreate_solution(&self, solution: &mut Solution, context: RecreateContext<'_>);
}
