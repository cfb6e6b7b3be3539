pub mod vault;
pub mod watcher;

pub use vault::{FsVault, MemVault, Vault, VaultError, load_days};
pub use watcher::NoteWatcher;
