pub mod block;
pub mod day_table;
pub mod config;

pub use block::*;
pub use day_table::*;
pub use config::*;
