use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indexmap::IndexMap;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::model::config::PlannerConfig;
use crate::model::day_table::{DayTable, TimeBlockSet};
use crate::parse::block_parser;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("no note at {path:?}")]
    NotFound { path: String },
    #[error("io error on {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Whole-document text storage keyed by vault-relative paths.
///
/// The patch layer reads and writes entire documents; this is the only
/// surface it needs from the outside world.
pub trait Vault {
    fn read(&self, path: &str) -> Result<String, VaultError>;
    fn write(&mut self, path: &str, contents: &str) -> Result<(), VaultError>;
    fn exists(&self, path: &str) -> bool;
}

/// A vault rooted in a directory on disk.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsVault { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Vault for FsVault {
    fn read(&self, path: &str) -> Result<String, VaultError> {
        match fs::read_to_string(self.full_path(path)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(VaultError::NotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(io_error(path, e)),
        }
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<(), VaultError> {
        let full = self.full_path(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
        }
        atomic_write(&full, contents.as_bytes()).map_err(|e| io_error(path, e))
    }

    fn exists(&self, path: &str) -> bool {
        self.full_path(path).exists()
    }
}

fn io_error(path: &str, source: io::Error) -> VaultError {
    VaultError::Io {
        path: path.to_string(),
        source,
    }
}

/// Write `content` to `path` atomically using a temp file + rename, so an
/// external reader never sees a half-written note.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// An in-memory vault for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemVault {
    files: IndexMap<String, String>,
}

impl MemVault {
    pub fn new() -> Self {
        MemVault::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn contents(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

impl Vault for MemVault {
    fn read(&self, path: &str) -> Result<String, VaultError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::NotFound {
                path: path.to_string(),
            })
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<(), VaultError> {
        self.files.insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

/// Load the given days' notes into one table. A day whose note does not
/// exist yet still gets an (empty) entry: the host can render it and
/// schedule blocks into it, and the create-file negotiation happens later
/// at write time.
pub fn load_days<V: Vault>(
    vault: &V,
    config: &PlannerConfig,
    days: &[NaiveDate],
) -> Result<DayTable, VaultError> {
    let mut table = DayTable::new();
    for &day in days {
        let path = config.note_path(day);
        if !vault.exists(&path) {
            table.insert_day(day, TimeBlockSet::default());
            continue;
        }
        let text = vault.read(&path)?;
        table.insert_day(day, block_parser::parse_day_note(&text, day, &path, config));
    }
    Ok(table)
}
