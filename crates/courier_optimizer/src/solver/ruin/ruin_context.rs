use rand::Rng;

use crate::problem::instance::ProblemInstance;

pub struct RuinContext<'a, R>
where
    R: Rng,
{
    pub instance: &'a ProblemInstance,
    pub rng: &'a mut R,
    /// How many assigned requests to take out. Operators remove exactly this
    /// many, or as many as the solution still holds.
    pub num_requests_to_remove: usize,
}
