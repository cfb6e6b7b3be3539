pub mod structural;
pub mod transaction;
pub mod update;
pub mod writer;

pub use transaction::{PostProcess, Transaction};
pub use update::{PatchError, StructuralEdit, Update, updates_from_diff};
pub use writer::{TransactionWriter, WriteError};
