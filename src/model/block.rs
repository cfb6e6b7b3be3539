use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::span::LineSpan;

/// Where a block's text lives in its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    /// Vault-relative path of the day note
    pub path: String,
    /// Lines of the whole list item (first line + indented continuations)
    pub span: LineSpan,
}

impl BlockLocation {
    pub fn new(path: impl Into<String>, start: usize, end: usize) -> Self {
        BlockLocation {
            path: path.into(),
            span: LineSpan::new(start, end),
        }
    }
}

/// A schedulable item on the day timeline.
///
/// Identity is the `id`: two blocks are the same task iff their ids match.
/// `start_minutes` is minutes from midnight and only meaningful while the
/// block sits in a day's scheduled set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Stable identity across edits
    pub id: String,
    /// Raw markdown of the whole list item
    pub text: String,
    /// The day this block belongs to
    pub day: NaiveDate,
    /// Minutes from midnight
    pub start_minutes: i64,
    /// Length in minutes
    pub duration_minutes: i64,
    /// Externally sourced (e.g. remote calendar): rendered, never edited
    pub remote: bool,

    /// Source location; `None` until the block is persisted somewhere
    #[serde(skip)]
    pub location: Option<BlockLocation>,
}

impl TimeBlock {
    /// Create a transient block (no source location yet)
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        day: NaiveDate,
        start_minutes: i64,
        duration_minutes: i64,
    ) -> Self {
        TimeBlock {
            id: id.into(),
            text: text.into(),
            day,
            start_minutes,
            duration_minutes,
            remote: false,
            location: None,
        }
    }

    /// End minute (exclusive)
    pub fn end_minutes(&self) -> i64 {
        self.start_minutes + self.duration_minutes
    }

    /// Half-open interval overlap: the earlier block's end must exceed the
    /// later block's start. Touching blocks do not overlap.
    pub fn overlaps(&self, other: &TimeBlock) -> bool {
        let (first, second) = if self.start_minutes <= other.start_minutes {
            (self, other)
        } else {
            (other, self)
        };
        first.end_minutes() > second.start_minutes
    }

    /// First line of the block's markdown
    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }
}

impl PartialEq for TimeBlock {
    // Location is bookkeeping, not identity or content
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.text == other.text
            && self.day == other.day
            && self.start_minutes == other.start_minutes
            && self.duration_minutes == other.duration_minutes
            && self.remote == other.remote
    }
}

impl Eq for TimeBlock {}
