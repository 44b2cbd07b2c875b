use std::fmt::Display;

use rand::Rng;

use crate::solver::solution::working_solution::Solution;

use super::{
    ruin_context::RuinContext, ruin_random::RuinRandom, ruin_shaw::RuinShaw,
    ruin_solution::RuinSolution, ruin_worst::RuinWorst,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuinStrategy {
    Shaw,
    Random,
    Worst,
}

impl RuinStrategy {
    pub fn all() -> Vec<RuinStrategy> {
        vec![RuinStrategy::Shaw, RuinStrategy::Random, RuinStrategy::Worst]
    }
}

impl Display for RuinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shaw => write!(f, "ShawRemoval"),
            Self::Random => write!(f, "RandomRemoval"),
            Self::Worst => write!(f, "WorstRemoval"),
        }
    }
}

impl RuinSolution for RuinStrategy {
    fn ruin_solution<R>(&self, solution: &mut Solution, context: RuinContext<'_, R>)
    where
        R: Rng,
    {
        match self {
            RuinStrategy::Shaw => RuinShaw.ruin_solution(solution, context),
            RuinStrategy::Random => RuinRandom.ruin_solution(solution, context),
            RuinStrategy::Worst => RuinWorst.ruin_solution(solution, context),
        }
    }
}
