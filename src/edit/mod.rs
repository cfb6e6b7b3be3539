pub mod diff;
pub mod resize;
pub mod session;
pub mod shift;
pub mod transform;

pub use diff::*;
pub use session::*;
pub use transform::*;
