//! Document-level edits. Everything here goes through the `Note` outline
//! and only ever splices lines inside the planner heading's section, so
//! non-standard markup elsewhere in a note can never be disturbed by a
//! reparse-and-reprint of the whole file.

use crate::model::config::PlannerConfig;
use crate::parse::note::Note;
use crate::parse::timestamp;
use crate::patch::update::{PatchError, StructuralEdit};

/// Apply one structural edit to a note's text.
///
/// A missing heading is created at the end of the document when the config
/// opts in; otherwise it is a hard error, since inserting under a heading
/// that does not exist has no sane fallback.
pub fn apply_structural(
    text: &str,
    path: &str,
    edit: &StructuralEdit,
    config: &PlannerConfig,
) -> Result<String, PatchError> {
    let StructuralEdit::InsertListItemUnderHeading { heading, item } = edit;
    let mut note = Note::parse(text);

    if note.find_heading(heading).is_none() {
        if !config.planner.create_heading {
            return Err(PatchError::HeadingNotFound {
                heading: heading.clone(),
                path: path.to_string(),
            });
        }
        let level = config.planner.heading_level.clamp(1, 6);
        note.ensure_section(&format!("{} {}", "#".repeat(level), heading));
    }

    if !note.insert_list_item(heading, item) {
        return Err(PatchError::HeadingNotFound {
            heading: heading.clone(),
            path: path.to_string(),
        });
    }
    Ok(note.serialize())
}

/// Re-sort the planner section's top-level items chronologically: timed
/// items first by start time, untimed items after them in their original
/// order. Stable for equal starts. Lines between and around items stay
/// exactly where they were.
pub fn sort_section_by_time(text: &str, config: &PlannerConfig) -> String {
    let mut note = Note::parse(text);
    let Some(bounds) = note.section_bounds(&config.planner.heading) else {
        return text.to_string();
    };
    let ranges = note.list_item_ranges(bounds.clone());
    if ranges.len() < 2 {
        return text.to_string();
    }

    let mut groups: Vec<(Option<i64>, Vec<String>)> = ranges
        .iter()
        .map(|range| {
            let lines = note.lines()[range.clone()].to_vec();
            let start = timestamp::leading_time_range(&lines[0]).map(|(start, _)| start);
            (start, lines)
        })
        .collect();
    groups.sort_by_key(|(start, _)| (start.is_none(), start.unwrap_or(0)));

    // Rebuild the section: the i-th item slot gets the i-th sorted group,
    // everything that is not an item keeps its place.
    let mut replacement: Vec<String> = Vec::new();
    let mut cursor = bounds.start;
    for (range, (_, lines)) in ranges.iter().zip(groups) {
        replacement.extend_from_slice(&note.lines()[cursor..range.start]);
        replacement.extend(lines);
        cursor = range.end;
    }
    replacement.extend_from_slice(&note.lines()[cursor..bounds.end]);

    note.replace_lines(bounds, replacement);
    note.serialize()
}
