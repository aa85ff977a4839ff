pub mod bounds;
pub mod config;
pub mod field;
pub mod finish;

pub use bounds::*;
pub use config::*;
pub use field::*;
pub use finish::*;
