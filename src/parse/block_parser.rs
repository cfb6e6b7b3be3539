use chrono::NaiveDate;

use crate::model::block::{BlockLocation, TimeBlock};
use crate::model::config::PlannerConfig;
use crate::model::day_table::TimeBlockSet;
use crate::parse::note::Note;
use crate::parse::timestamp;

/// Stable id for a block parsed out of a note: path plus first line
pub fn block_id(path: &str, first_line: usize) -> String {
    format!("{}:{}", path, first_line)
}

/// Parse the planner section of a day note into scheduled and unscheduled
/// blocks. Only top-level list items under the planner heading count; notes
/// without that heading yield an empty set.
///
/// Items with a leading time range are scheduled with the range's duration,
/// items with a single leading time get the configured default duration, and
/// items without a leading time land in the unscheduled set.
pub fn parse_day_note(
    text: &str,
    day: NaiveDate,
    path: &str,
    config: &PlannerConfig,
) -> TimeBlockSet {
    let note = Note::parse(text);
    let mut set = TimeBlockSet::default();
    let Some(bounds) = note.section_bounds(&config.planner.heading) else {
        return set;
    };

    for range in note.list_item_ranges(bounds) {
        let first_line = &note.lines()[range.start];
        let item_text = note.lines()[range.clone()].join("\n");
        let mut block = TimeBlock::new(
            block_id(path, range.start),
            item_text,
            day,
            0,
            config.edit.default_duration_minutes,
        );
        block.location = Some(BlockLocation::new(path, range.start, range.end));

        match timestamp::leading_time_range(first_line) {
            Some((start, end)) => {
                block.start_minutes = start;
                if let Some(end) = end {
                    block.duration_minutes = end - start;
                }
                set.scheduled.push(block);
            }
            None => set.unscheduled.push(block),
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const NOTE: &str = "\
# 2025-05-10

## Day planner

- 08:30 - 09:00 Email sweep
- 10:00 Standup
- 13:00 - 14:30 Deep work
  with a continuation line
- Buy milk

## Log

- 09:00 - 09:30 not a planner item
";

    #[test]
    fn test_parse_day_note() {
        let config = PlannerConfig::default();
        let set = parse_day_note(NOTE, day("2025-05-10"), "notes/2025-05-10.md", &config);

        assert_eq!(set.scheduled.len(), 3);
        assert_eq!(set.unscheduled.len(), 1);

        let email = &set.scheduled[0];
        assert_eq!(email.id, "notes/2025-05-10.md:4");
        assert_eq!(email.start_minutes, 8 * 60 + 30);
        assert_eq!(email.duration_minutes, 30);
        assert_eq!(email.text, "- 08:30 - 09:00 Email sweep");
        assert_eq!(email.day, day("2025-05-10"));
        assert!(!email.remote);

        let milk = &set.unscheduled[0];
        assert_eq!(milk.text, "- Buy milk");
    }

    #[test]
    fn test_single_time_gets_default_duration() {
        let config = PlannerConfig::default();
        let set = parse_day_note(NOTE, day("2025-05-10"), "notes/2025-05-10.md", &config);
        let standup = &set.scheduled[1];
        assert_eq!(standup.start_minutes, 10 * 60);
        assert_eq!(
            standup.duration_minutes,
            config.edit.default_duration_minutes
        );
    }

    #[test]
    fn test_continuation_lines_belong_to_block() {
        let config = PlannerConfig::default();
        let set = parse_day_note(NOTE, day("2025-05-10"), "notes/2025-05-10.md", &config);
        let deep = &set.scheduled[2];
        assert_eq!(deep.text, "- 13:00 - 14:30 Deep work\n  with a continuation line");
        let location = deep.location.as_ref().unwrap();
        assert_eq!(location.span.start(), 6);
        assert_eq!(location.span.end(), 8);
    }

    #[test]
    fn test_items_outside_planner_section_ignored() {
        let config = PlannerConfig::default();
        let set = parse_day_note(NOTE, day("2025-05-10"), "notes/2025-05-10.md", &config);
        assert!(set.scheduled.iter().all(|b| !b.text.contains("not a planner item")));
    }

    #[test]
    fn test_note_without_planner_heading_is_empty() {
        let config = PlannerConfig::default();
        let set = parse_day_note(
            "# 2025-05-10\n\njust an entry\n",
            day("2025-05-10"),
            "notes/2025-05-10.md",
            &config,
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_cross_midnight_range() {
        let config = PlannerConfig::default();
        let set = parse_day_note(
            "## Day planner\n\n- 23:30 - 00:30 Night shift\n",
            day("2025-05-10"),
            "notes/2025-05-10.md",
            &config,
        );
        let shift = &set.scheduled[0];
        assert_eq!(shift.start_minutes, 23 * 60 + 30);
        assert_eq!(shift.duration_minutes, 60);
    }
}
