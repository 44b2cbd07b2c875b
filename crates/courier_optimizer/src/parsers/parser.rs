use std::path::Path;

use crate::{error::DataError, problem::instance::ProblemInstance};

pub trait DatasetParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<ProblemInstance, DataError>;
}
