pub mod filter;
pub mod run;
pub mod target;
