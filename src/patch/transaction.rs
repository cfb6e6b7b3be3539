use indexmap::IndexMap;

use crate::model::config::PlannerConfig;
use crate::patch::structural;
use crate::patch::update::{PatchError, StructuralEdit, Update};

/// Whole-file rewrite that runs after all of a path's updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Chronologically re-sort the planner section's items
    SortPlannerSection,
}

/// All the updates aimed at one file, in application order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilePatch {
    /// Deleted/Updated first (sorted by start line), then Created
    range_updates: Vec<Update>,
    structural: Vec<StructuralEdit>,
    post_process: Option<PostProcess>,
}

impl FilePatch {
    /// Apply this patch as one `contents -> contents` step.
    ///
    /// Range updates carry line numbers in the original file's coordinates,
    /// so they are applied bottom-of-file first: rewriting or deleting a
    /// later range never invalidates the line numbers of an earlier one.
    /// Structural edits reparse the already-patched text and post-processing
    /// runs last.
    fn apply(
        &self,
        path: &str,
        contents: &str,
        config: &PlannerConfig,
    ) -> Result<String, PatchError> {
        let trailing = contents.ends_with('\n');
        let mut lines: Vec<String> = contents.lines().map(String::from).collect();

        for update in self.range_updates.iter().rev() {
            match update {
                Update::Deleted { span, .. } => {
                    let start = span.start().min(lines.len());
                    let end = span.end().clamp(start, lines.len());
                    lines.drain(start..end);
                }
                Update::Updated { line, contents, .. } => {
                    if *line >= lines.len() {
                        return Err(PatchError::LineOutOfRange {
                            path: path.to_string(),
                            line: *line,
                        });
                    }
                    lines.splice(*line..=*line, contents.lines().map(String::from));
                }
                Update::Created {
                    contents, at_line, ..
                } => {
                    let at = (*at_line).min(lines.len());
                    lines.splice(at..at, contents.lines().map(String::from));
                }
                Update::Structural { .. } => {}
            }
        }

        let mut text = if lines.is_empty() {
            String::new()
        } else {
            let mut text = lines.join("\n");
            if trailing {
                text.push('\n');
            }
            text
        };

        for edit in &self.structural {
            text = structural::apply_structural(&text, path, edit, config)?;
        }
        if let Some(PostProcess::SortPlannerSection) = self.post_process {
            text = structural::sort_section_by_time(&text, config);
        }
        Ok(text)
    }
}

/// A batch of updates grouped by file, each file reduced to a single
/// combined patch. Built fresh for every write; the writer keeps only the
/// undo snapshot, never the transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    patches: IndexMap<String, FilePatch>,
}

impl Transaction {
    /// Group updates by path, in first-seen path order. Within a path,
    /// range updates are sorted by start line with all insertions ordered
    /// after them, which makes the combined patch independent of the
    /// declaration order of the updates.
    pub fn new(updates: Vec<Update>) -> Self {
        let mut patches: IndexMap<String, FilePatch> = IndexMap::new();
        for update in updates {
            let patch = patches.entry(update.path().to_string()).or_default();
            match update {
                Update::Structural { edit, .. } => patch.structural.push(edit),
                range => patch.range_updates.push(range),
            }
        }
        for patch in patches.values_mut() {
            patch
                .range_updates
                .sort_by_key(|u| (matches!(u, Update::Created { .. }), u.start_line()));
        }
        Transaction { patches }
    }

    /// Like `new`, but attaches the chronological-sort hook to every file
    /// when the config asks for sorted planner sections.
    pub fn for_updates(updates: Vec<Update>, config: &PlannerConfig) -> Self {
        let mut transaction = Transaction::new(updates);
        if config.planner.sort_on_write {
            for patch in transaction.patches.values_mut() {
                patch.post_process = Some(PostProcess::SortPlannerSection);
            }
        }
        transaction
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Target paths in first-seen order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.patches.keys().map(String::as_str)
    }

    /// Apply the patch for `path`. Paths without updates pass through.
    pub fn apply(
        &self,
        path: &str,
        contents: &str,
        config: &PlannerConfig,
    ) -> Result<String, PatchError> {
        match self.patches.get(path) {
            Some(patch) => patch.apply(path, contents, config),
            None => Ok(contents.to_string()),
        }
    }
}
