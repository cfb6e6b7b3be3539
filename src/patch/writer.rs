use indexmap::IndexMap;
use thiserror::Error;

use crate::io::vault::{Vault, VaultError};
use crate::model::config::PlannerConfig;
use crate::patch::transaction::Transaction;
use crate::patch::update::PatchError;

/// Undo frames kept; only the most recent one is a guaranteed capability,
/// the rest are best-effort convenience.
const HISTORY_LIMIT: usize = 32;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Persists transactions against a vault and keeps undo snapshots.
///
/// Writes go path by path: read, capture the prior contents, apply the
/// patch, write back. A failure stops the loop immediately; paths already
/// written stay written, nothing is rolled back, and no history frame is
/// recorded for the partial write. Only a fully successful transaction
/// becomes undoable.
pub struct TransactionWriter<V: Vault> {
    vault: V,
    config: PlannerConfig,
    history: Vec<IndexMap<String, String>>,
}

impl<V: Vault> TransactionWriter<V> {
    pub fn new(vault: V, config: PlannerConfig) -> Self {
        TransactionWriter {
            vault,
            config,
            history: Vec::new(),
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Transaction targets the vault does not have yet. Hosts run their
    /// create-the-file confirmation against this list before writing.
    pub fn missing_paths(&self, transaction: &Transaction) -> Vec<String> {
        transaction
            .paths()
            .filter(|path| !self.vault.exists(path))
            .map(String::from)
            .collect()
    }

    /// Apply a transaction to every path it targets.
    pub fn write(&mut self, transaction: &Transaction) -> Result<(), WriteError> {
        let mut frame: IndexMap<String, String> = IndexMap::new();
        for path in transaction.paths() {
            let previous = self.vault.read(path)?;
            let next = transaction.apply(path, &previous, &self.config)?;
            self.vault.write(path, &next)?;
            frame.insert(path.to_string(), previous);
        }
        if !frame.is_empty() {
            if self.history.len() == HISTORY_LIMIT {
                self.history.remove(0);
            }
            self.history.push(frame);
        }
        Ok(())
    }

    /// Rewrite every path recorded by the most recent successful write back
    /// to its captured contents.
    pub fn undo(&mut self) -> Result<(), WriteError> {
        let frame = self.history.pop().ok_or(WriteError::NothingToUndo)?;
        for (path, contents) in &frame {
            self.vault.write(path, contents)?;
        }
        Ok(())
    }
}
