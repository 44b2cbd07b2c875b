pub mod route;
pub mod summary;
pub mod working_solution;
