use chrono::NaiveDate;
use dayplan::edit::{Cursor, EditMode, EditOperation, EditSession};
use dayplan::model::{DayTable, PlannerConfig};
use dayplan::parse::{parse_day_note, Note};
use dayplan::patch::{updates_from_diff, Transaction};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn load_fixture(fixture_name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture_name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", fixture_name, e))
}

/// Helper: load a fixture file, parse it, serialize it, and assert byte-for-byte equality
fn assert_note_round_trip(fixture_name: &str) {
    let source = load_fixture(fixture_name);
    let output = Note::parse(&source).serialize();
    assert_eq!(
        output, source,
        "Round-trip failed for fixture: {}",
        fixture_name
    );
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ============================================================================
// Note round-trip tests
// ============================================================================

#[test]
fn round_trip_full_day() {
    assert_note_round_trip("full_day.md");
}

#[test]
fn round_trip_code_in_planner() {
    assert_note_round_trip("code_in_planner.md");
}

#[test]
fn round_trip_no_planner() {
    assert_note_round_trip("no_planner.md");
}

// ============================================================================
// Parse correctness tests
// ============================================================================

#[test]
fn full_day_parse_correctness() {
    let source = load_fixture("full_day.md");
    let config = PlannerConfig::default();
    let set = parse_day_note(&source, day("2025-05-10"), "notes/2025-05-10.md", &config);

    assert_eq!(set.scheduled.len(), 4);
    assert_eq!(set.unscheduled.len(), 2);

    let email = &set.scheduled[0];
    assert_eq!(email.id, "notes/2025-05-10.md:6");
    assert_eq!(email.start_minutes, 8 * 60 + 30);
    assert_eq!(email.duration_minutes, 30);

    // Continuation lines belong to the item, and its span covers both lines
    let deep = &set.scheduled[1];
    assert_eq!(
        deep.text,
        "- 09:00 - 10:30 Deep work: parser refactor\n  carry-over from yesterday"
    );
    let span = &deep.location.as_ref().unwrap().span;
    assert_eq!((span.start(), span.end()), (7, 9));

    // A bare start time gets the configured default duration
    let standup = &set.scheduled[2];
    assert_eq!(standup.start_minutes, 10 * 60);
    assert_eq!(
        standup.duration_minutes,
        config.edit.default_duration_minutes
    );

    // Items under other headings never become blocks
    assert!(set
        .scheduled
        .iter()
        .all(|b| !b.text.contains("started late")));

    let bank = &set.unscheduled[1];
    assert_eq!(bank.text, "- Call the bank\n  ref: loan paperwork");
}

#[test]
fn code_fences_never_produce_blocks() {
    let source = load_fixture("code_in_planner.md");
    let config = PlannerConfig::default();
    let set = parse_day_note(&source, day("2025-06-01"), "notes/2025-06-01.md", &config);

    assert_eq!(
        set.scheduled.len(),
        2,
        "Fenced lines should not be parsed as planner items"
    );
    assert!(set.unscheduled.is_empty());

    // The indented fence is carried as continuation text of the first item
    let import = &set.scheduled[0];
    assert!(import.text.contains("- not a planner item"));
    assert_eq!(import.duration_minutes, 120);

    // The fenced duplicate heading at the bottom is not a section boundary
    let review = &set.scheduled[1];
    assert_eq!(review.id, "notes/2025-06-01.md:9");
}

#[test]
fn no_planner_heading_parses_empty() {
    let source = load_fixture("no_planner.md");
    let config = PlannerConfig::default();
    let set = parse_day_note(&source, day("2025-07-04"), "notes/2025-07-04.md", &config);
    assert!(set.is_empty());
}

// ============================================================================
// Selective rewrite tests
// ============================================================================

/// The core property: confirming an edit should ONLY change the edited
/// block's first line in the output. Continuations, sibling items, and all
/// prose around the planner section must remain byte-for-byte identical.
#[test]
fn selective_rewrite_only_edited_line_changes() {
    let source = load_fixture("full_day.md");
    let config = PlannerConfig::default();
    let d = day("2025-05-10");

    let mut table = DayTable::new();
    table.insert_day(d, parse_day_note(&source, d, "notes/2025-05-10.md", &config));

    let email = table
        .find_block("notes/2025-05-10.md:6")
        .expect("email block parsed")
        .2
        .clone();

    let mut session = EditSession::new(table, config.clone());
    session
        .begin(EditOperation::new(email, EditMode::Drag), Cursor::new(d, 8 * 60 + 30))
        .unwrap();
    session.update_cursor(Cursor::new(d, 9 * 60));
    let diff = session.confirm().unwrap();

    let updates = updates_from_diff(&diff, &config).unwrap();
    let tx = Transaction::for_updates(updates, &config);
    let output = tx.apply("notes/2025-05-10.md", &source, &config).unwrap();

    let expected = source.replace(
        "- 08:30 - 09:00 Email sweep",
        "- 09:00 - 09:30 Email sweep",
    );
    assert_eq!(output, expected);
}

/// Deleting a block removes its whole span, continuation lines included,
/// and nothing else.
#[test]
fn selective_delete_removes_full_item() {
    let source = load_fixture("full_day.md");
    let config = PlannerConfig::default();
    let d = day("2025-05-10");

    let mut table = DayTable::new();
    table.insert_day(d, parse_day_note(&source, d, "notes/2025-05-10.md", &config));
    let bank = table
        .find_block("notes/2025-05-10.md:12")
        .expect("bank block parsed")
        .2
        .clone();

    let mut session = EditSession::new(table, config.clone());
    session
        .begin(EditOperation::new(bank, EditMode::Delete), Cursor::new(d, 0))
        .unwrap();
    let diff = session.confirm().unwrap();

    let updates = updates_from_diff(&diff, &config).unwrap();
    let tx = Transaction::for_updates(updates, &config);
    let output = tx.apply("notes/2025-05-10.md", &source, &config).unwrap();

    let expected = source.replace("- Call the bank\n  ref: loan paperwork\n", "");
    assert_eq!(output, expected);
}
