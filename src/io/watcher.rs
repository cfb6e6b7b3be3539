use std::path::{Path, PathBuf};
use std::sync::mpsc;

use chrono::NaiveDate;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::model::config::PlannerConfig;

/// Watches a vault directory for day-note changes on disk.
///
/// The notify backend pushes events onto a channel; `poll` drains it
/// without blocking, so a host loop can call it once per tick and re-sync
/// the session baseline when something changed underneath it.
pub struct NoteWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
    rx: mpsc::Receiver<Vec<PathBuf>>,
}

impl NoteWatcher {
    /// Start watching the vault root recursively.
    pub fn start(root: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let root_owned = root.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(event) => event,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let notes: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| {
                        p.starts_with(&root_owned)
                            && p.extension().and_then(|e| e.to_str()) == Some("md")
                    })
                    .collect();

                if !notes.is_empty() {
                    let _ = tx.send(notes);
                }
            },
            Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(NoteWatcher {
            _watcher: watcher,
            root: root.to_path_buf(),
            rx,
        })
    }

    /// Non-blocking: all note paths queued since the last poll,
    /// deduplicated.
    pub fn poll(&self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        while let Ok(paths) = self.rx.try_recv() {
            changed.extend(paths);
        }
        changed.sort();
        changed.dedup();
        changed
    }

    /// Days whose notes changed since the last poll. Markdown files that do
    /// not name a day note under the configured folder are dropped.
    pub fn changed_days(&self, config: &PlannerConfig) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self
            .poll()
            .iter()
            .filter_map(|path| {
                let rel = path.strip_prefix(&self.root).ok()?;
                config.day_for_path(rel.to_str()?)
            })
            .collect();
        days.sort();
        days.dedup();
        days
    }
}
