pub mod alns;
pub mod noise;
pub mod params;
pub mod recreate;
pub mod ruin;
pub mod solution;
pub mod two_stage;
pub mod weights;
