pub mod audit;
pub mod volume;
