pub mod li_lim;
pub mod parser;
