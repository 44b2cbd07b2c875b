use thiserror::Error;

/// Parameter validation failure. Raised at construction and fatal to the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter `{name}` out of range: {value} (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("removal bounds inconsistent: upper bound {upper} < lower bound {lower}")]
    RemovalBounds { lower: usize, upper: usize },

    #[error(
        "cannot derive an annealing start temperature from a zero-cost solution \
         (objective without request bank must be positive, got {objective})"
    )]
    ZeroStartObjective { objective: f64 },
}

/// Malformed problem input. Raised by readers/builders and fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("depot node id must be 0, got {0}")]
    BadDepotId(usize),

    #[error("pickup node {pickup} and delivery node {delivery} have mismatched demands")]
    DemandMismatch { pickup: usize, delivery: usize },

    #[error("node {referenced} referenced by {by} does not exist")]
    DanglingNode { referenced: usize, by: String },

    #[error("instance validation failed: {0}")]
    Invalid(String),
}

/// The two-stage driver could not reach a feasible assignment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvergenceError {
    #[error("request {0} cannot be inserted even after adding a fresh vehicle")]
    StuckRequest(usize),

    #[error("fleet-growth phase did not converge within {0} attempts")]
    AttemptsExhausted(usize),
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
}
