use std::fmt::Display;

use crate::solver::solution::working_solution::Solution;

use super::{
    greedy_insertion::GreedyInsertion, recreate_context::RecreateContext,
    recreate_solution::RecreateSolution, regret_insertion::RegretInsertion,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecreateStrategy {
    Greedy,
    Regret(usize),
}

impl RecreateStrategy {
    /// The standard portfolio: greedy plus regret-2/3/4 and regret over the
    /// whole fleet of `m` vehicles. Regret-k requires k alternatives per
    /// request, so horizons beyond the fleet size are left out.
    pub fn portfolio(m: usize) -> Vec<RecreateStrategy> {
        let mut strategies = vec![RecreateStrategy::Greedy];
        for k in [2, 3, 4] {
            if k <= m {
                strategies.push(RecreateStrategy::Regret(k));
            }
        }
        if m > 4 {
            strategies.push(RecreateStrategy::Regret(m));
        }
        strategies
    }
}

impl Display for RecreateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "GreedyInsertion"),
            Self::Regret(k) => write!(f, "RegretInsertion({k})"),
        }
    }
}

impl RecreateSolution for RecreateStrategy {
    fn recreate_solution(&self, solution: &mut Solution, context: RecreateContext<'_>) {
        match self {
            RecreateStrategy::Greedy => GreedyInsertion.recreate_solution(solution, context),
            RecreateStrategy::Regret(k) => {
                RegretInsertion::new(*k).recreate_solution(solution, context)
            }
        }
    }
}
