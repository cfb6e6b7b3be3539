pub mod fraction;
pub mod overlap;

pub use fraction::*;
pub use overlap::*;
