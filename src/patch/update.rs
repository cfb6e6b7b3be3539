use thiserror::Error;

use crate::edit::diff::BlockDiff;
use crate::model::config::PlannerConfig;
use crate::parse::block_serializer;
use crate::parse::span::LineSpan;

/// One low-level text-patch instruction against a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Remove whole lines
    Deleted { path: String, span: LineSpan },
    /// Rewrite one line in place
    Updated {
        path: String,
        line: usize,
        contents: String,
    },
    /// Insert lines at an absolute line number
    Created {
        path: String,
        contents: String,
        at_line: usize,
    },
    /// A document-level edit applied by reparsing
    Structural { path: String, edit: StructuralEdit },
}

impl Update {
    pub fn path(&self) -> &str {
        match self {
            Update::Deleted { path, .. }
            | Update::Updated { path, .. }
            | Update::Created { path, .. }
            | Update::Structural { path, .. } => path,
        }
    }

    /// Sort line for range updates
    pub(crate) fn start_line(&self) -> usize {
        match self {
            Update::Deleted { span, .. } => span.start(),
            Update::Updated { line, .. } => *line,
            Update::Created { at_line, .. } => *at_line,
            Update::Structural { .. } => 0,
        }
    }
}

/// Structural edits are plain data, not closures, so a transaction can be
/// inspected and asserted on before it touches any file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralEdit {
    /// Append a list item at the end of the named heading's section
    InsertListItemUnderHeading { heading: String, item: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("block {id:?} has no source location but the patch needs one")]
    MissingLocation { id: String },
    #[error("heading {heading:?} not found in {path:?}")]
    HeadingNotFound { heading: String, path: String },
    #[error("line {line} out of range in {path:?}")]
    LineOutOfRange { path: String, line: usize },
}

/// Turn a classified diff into patch instructions.
///
/// Deleted blocks lose their full stored span and updated blocks get only
/// their first line rewritten, so indented continuation lines survive both
/// kinds of edit untouched. Created blocks without a location become a
/// structural insert into the destination day's note; the rare created
/// block that already knows its location becomes a plain line insertion.
pub fn updates_from_diff(
    diff: &BlockDiff,
    config: &PlannerConfig,
) -> Result<Vec<Update>, PatchError> {
    let mut updates = Vec::new();

    for flat in &diff.deleted {
        let location = flat
            .block
            .location
            .as_ref()
            .ok_or_else(|| PatchError::MissingLocation {
                id: flat.block.id.clone(),
            })?;
        updates.push(Update::Deleted {
            path: location.path.clone(),
            span: location.span.clone(),
        });
    }

    for flat in &diff.updated {
        let location = flat
            .block
            .location
            .as_ref()
            .ok_or_else(|| PatchError::MissingLocation {
                id: flat.block.id.clone(),
            })?;
        updates.push(Update::Updated {
            path: location.path.clone(),
            line: location.span.start(),
            contents: block_serializer::render_first_line(&flat.block, flat.scheduled),
        });
    }

    for flat in &diff.created {
        let contents = block_serializer::render_block(&flat.block, flat.scheduled);
        match &flat.block.location {
            Some(location) => updates.push(Update::Created {
                path: location.path.clone(),
                contents,
                at_line: location.span.start(),
            }),
            None => updates.push(Update::Structural {
                path: config.note_path(flat.block.day),
                edit: StructuralEdit::InsertListItemUnderHeading {
                    heading: config.planner.heading.clone(),
                    item: contents,
                },
            }),
        }
    }

    Ok(updates)
}
