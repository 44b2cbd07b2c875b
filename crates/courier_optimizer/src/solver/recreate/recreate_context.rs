use rand::rngs::SmallRng;

use crate::{problem::instance::ProblemInstance, solver::noise::CostNoiser};

pub struct RecreateContext<'a> {
    pub instance: &'a ProblemInstance,
    pub rng: &'a mut SmallRng,
    pub noiser: CostNoiser,
    /// The destroy quota of this iteration; repair reinserts up to this many
    /// requests unless `insert_unlimited` lifts the limit.
    pub quota: usize,
    pub insert_unlimited: bool,
}
