use chrono::NaiveDate;
use thiserror::Error;

use crate::edit::{resize, shift};
use crate::model::block::TimeBlock;
use crate::model::config::PlannerConfig;
use crate::model::day_table::{Bucket, DayTable};

/// The timeline position the pointer is over. Minutes are unclamped; a
/// gesture may point above midnight or past the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub day: NaiveDate,
    pub minutes: i64,
}

impl Cursor {
    pub fn new(day: NaiveDate, minutes: i64) -> Self {
        Cursor { day, minutes }
    }
}

/// The kind of gesture an edit operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Drag,
    DragAndShiftOthers,
    Resize,
    ResizeFromTop,
    ResizeAndShiftOthers,
    ResizeFromTopAndShiftOthers,
    ResizeAndShrinkOthers,
    ResizeFromTopAndShrinkOthers,
    Create,
    Delete,
    Schedule,
}

/// An edit in progress: the gesture, its target, and the day the target
/// belonged to when the gesture began.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOperation {
    /// Snapshot of the target block (the transient block itself for
    /// `Create`); the live copy is looked up by id in the baseline.
    pub block: TimeBlock,
    pub mode: EditMode,
    /// The target's own day at gesture start; resize-family transforms
    /// stay on this day no matter where the cursor goes.
    pub day: NaiveDate,
}

impl EditOperation {
    pub fn new(block: TimeBlock, mode: EditMode) -> Self {
        let day = block.day;
        EditOperation { block, mode, day }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no block with id {id:?} in the day table")]
    BlockNotFound { id: String },
    #[error("block {id:?} is not in an unscheduled set")]
    NotUnscheduled { id: String },
    #[error("block {id:?} is externally sourced and read-only")]
    RemoteBlock { id: String },
    #[error("an edit is already in progress")]
    EditInProgress,
    #[error("sync in progress, edits are locked out")]
    SyncInProgress,
    #[error("no edit is in progress")]
    NoActiveEdit,
}

/// Apply an in-progress edit to a baseline table, producing the table the
/// host should render. Pure: called once per cursor move, same cursor in,
/// same table out, and the baseline is never touched.
///
/// Drag, create and schedule gestures land on the cursor's day; resize and
/// delete stay on the operation's own day. Externally sourced blocks pass
/// through untouched: they are split off before the mode transform runs on
/// the start-sorted editable blocks and merged back after.
pub fn transform(
    baseline: &DayTable,
    cursor: Cursor,
    operation: &EditOperation,
    config: &PlannerConfig,
) -> Result<DayTable, EditError> {
    let mut table = baseline.clone();
    let id = operation.block.id.as_str();
    let mode = operation.mode;

    if mode != EditMode::Create
        && let Some((_, _, block)) = table.find_block(id)
        && block.remote
    {
        return Err(EditError::RemoteBlock { id: id.to_string() });
    }

    let dest_day = match mode {
        EditMode::Drag | EditMode::DragAndShiftOthers | EditMode::Create | EditMode::Schedule => {
            cursor.day
        }
        _ => operation.day,
    };

    match mode {
        EditMode::Delete => {
            table
                .remove_block(id)
                .ok_or_else(|| EditError::BlockNotFound { id: id.to_string() })?;
            return Ok(table);
        }
        EditMode::Create => {
            let mut block = operation.block.clone();
            block.start_minutes = cursor.minutes;
            block.duration_minutes = config.edit.default_duration_minutes;
            block.location = None;
            table.insert_scheduled(dest_day, block);
            return Ok(table);
        }
        EditMode::Schedule => {
            let (_, bucket, mut block) = table
                .remove_block(id)
                .ok_or_else(|| EditError::BlockNotFound { id: id.to_string() })?;
            if bucket != Bucket::Unscheduled {
                return Err(EditError::NotUnscheduled { id: id.to_string() });
            }
            block.start_minutes = cursor.minutes;
            table.insert_scheduled(dest_day, block);
            return Ok(table);
        }
        _ => {}
    }

    // Drag and resize families work on the destination day's timeline
    if !table.move_block_to_day(id, dest_day) {
        return Err(EditError::BlockNotFound { id: id.to_string() });
    }

    let set = table.bucket_mut(dest_day);
    let (mut editable, remote): (Vec<TimeBlock>, Vec<TimeBlock>) =
        std::mem::take(&mut set.scheduled)
            .into_iter()
            .partition(|b| !b.remote);
    editable.sort_by_key(|b| b.start_minutes);

    let pivot = editable
        .iter()
        .position(|b| b.id == id)
        .ok_or_else(|| EditError::BlockNotFound { id: id.to_string() })?;

    let minimal = config.edit.minimal_duration_minutes;

    // Move the edited edge
    match mode {
        EditMode::Drag | EditMode::DragAndShiftOthers => {
            editable[pivot].start_minutes = cursor.minutes;
        }
        EditMode::Resize | EditMode::ResizeAndShiftOthers | EditMode::ResizeAndShrinkOthers => {
            resize::resize_bottom(&mut editable[pivot], cursor.minutes, minimal);
        }
        EditMode::ResizeFromTop
        | EditMode::ResizeFromTopAndShiftOthers
        | EditMode::ResizeFromTopAndShrinkOthers => {
            resize::resize_top(&mut editable[pivot], cursor.minutes, minimal);
        }
        _ => {}
    }

    // Settle the neighbors on the touched side
    let settled = match mode {
        EditMode::DragAndShiftOthers => {
            let forward = shift::shift_forward(&editable, pivot);
            shift::shift_backward(&forward, pivot)
        }
        EditMode::ResizeAndShiftOthers => shift::shift_forward(&editable, pivot),
        EditMode::ResizeFromTopAndShiftOthers => shift::shift_backward(&editable, pivot),
        EditMode::ResizeAndShrinkOthers => shift::shrink_forward(&editable, pivot, minimal),
        EditMode::ResizeFromTopAndShrinkOthers => shift::shrink_backward(&editable, pivot, minimal),
        _ => editable,
    };

    let set = table.bucket_mut(dest_day);
    set.scheduled = settled;
    set.scheduled.extend(remote);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::day_table::TimeBlockSet;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn block(id: &str, start: i64, duration: i64) -> TimeBlock {
        TimeBlock::new(id, format!("- {}", id), day("2025-05-10"), start, duration)
    }

    fn table(blocks: Vec<TimeBlock>) -> DayTable {
        let mut t = DayTable::new();
        for b in blocks {
            t.insert_scheduled(b.day, b);
        }
        t
    }

    fn scheduled(table: &DayTable, d: NaiveDate) -> Vec<(String, i64, i64)> {
        let mut blocks: Vec<&TimeBlock> = table
            .get(d)
            .map(|set| set.scheduled.iter().collect())
            .unwrap_or_default();
        blocks.sort_by_key(|b| b.start_minutes);
        blocks
            .iter()
            .map(|b| (b.id.clone(), b.start_minutes, b.duration_minutes))
            .collect()
    }

    fn op(target: &TimeBlock, mode: EditMode) -> EditOperation {
        EditOperation::new(target.clone(), mode)
    }

    #[test]
    fn test_drag_moves_target_only() {
        let a = block("a", 60, 30);
        let b = block("b", 120, 30);
        let baseline = table(vec![a.clone(), b.clone()]);
        let cursor = Cursor::new(day("2025-05-10"), 110);
        let config = PlannerConfig::default();

        let out = transform(&baseline, cursor, &op(&a, EditMode::Drag), &config).unwrap();
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("a".into(), 110, 30), ("b".into(), 120, 30)]
        );
    }

    #[test]
    fn test_drag_across_days_follows_cursor() {
        let a = block("a", 60, 30);
        let baseline = table(vec![a.clone(), block("b", 120, 30)]);
        let cursor = Cursor::new(day("2025-05-11"), 540);
        let config = PlannerConfig::default();

        let out = transform(&baseline, cursor, &op(&a, EditMode::Drag), &config).unwrap();
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("b".into(), 120, 30)]
        );
        assert_eq!(
            scheduled(&out, day("2025-05-11")),
            vec![("a".into(), 540, 30)]
        );
        let moved = out.find_block("a").unwrap().2;
        assert_eq!(moved.day, day("2025-05-11"));
    }

    #[test]
    fn test_drag_and_shift_settles_both_sides() {
        let a = block("a", 0, 40);
        let b = block("b", 60, 60);
        let c = block("c", 120, 30);
        let baseline = table(vec![a, b.clone(), c]);
        let cursor = Cursor::new(day("2025-05-10"), 30);
        let config = PlannerConfig::default();

        let out = transform(
            &baseline,
            cursor,
            &op(&b, EditMode::DragAndShiftOthers),
            &config,
        )
        .unwrap();
        // b lands at the cursor, pushes c down and pulls a up
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("a".into(), -10, 40), ("b".into(), 30, 60), ("c".into(), 120, 30)]
        );
    }

    #[test]
    fn test_resize_bottom_only_touches_target() {
        let a = block("a", 60, 30);
        let b = block("b", 120, 30);
        let baseline = table(vec![a.clone(), b]);
        let cursor = Cursor::new(day("2025-05-10"), 140);
        let config = PlannerConfig::default();

        let out = transform(&baseline, cursor, &op(&a, EditMode::Resize), &config).unwrap();
        // transient overlap with b is allowed
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("a".into(), 60, 80), ("b".into(), 120, 30)]
        );
    }

    #[test]
    fn test_resize_ignores_cursor_day() {
        let a = block("a", 60, 30);
        let baseline = table(vec![a.clone()]);
        // cursor wandered onto another day; resize stays home
        let cursor = Cursor::new(day("2025-05-12"), 140);
        let config = PlannerConfig::default();

        let out = transform(&baseline, cursor, &op(&a, EditMode::Resize), &config).unwrap();
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("a".into(), 60, 80)]
        );
        assert!(out.get(day("2025-05-12")).is_none_or(|s| s.is_empty()));
    }

    #[test]
    fn test_resize_and_shift_pushes_followers() {
        let a = block("a", 60, 30);
        let b = block("b", 120, 30);
        let baseline = table(vec![a.clone(), b]);
        let cursor = Cursor::new(day("2025-05-10"), 140);
        let config = PlannerConfig::default();

        let out = transform(
            &baseline,
            cursor,
            &op(&a, EditMode::ResizeAndShiftOthers),
            &config,
        )
        .unwrap();
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("a".into(), 60, 80), ("b".into(), 140, 30)]
        );
    }

    #[test]
    fn test_resize_from_top_and_shift_pulls_predecessors() {
        let a = block("a", 60, 30);
        let b = block("b", 120, 60);
        let baseline = table(vec![a, b.clone()]);
        let cursor = Cursor::new(day("2025-05-10"), 80);
        let config = PlannerConfig::default();

        let out = transform(
            &baseline,
            cursor,
            &op(&b, EditMode::ResizeFromTopAndShiftOthers),
            &config,
        )
        .unwrap();
        // b's top edge moves to 80 (end fixed at 180); a is pulled up
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("a".into(), 50, 30), ("b".into(), 80, 100)]
        );
    }

    #[test]
    fn test_resize_and_shrink_respects_floor() {
        let a = block("a", 60, 30);
        let b = block("b", 120, 30);
        let c = block("c", 150, 30);
        let baseline = table(vec![a.clone(), b, c]);
        let cursor = Cursor::new(day("2025-05-10"), 170);
        let config = PlannerConfig::default();

        let out = transform(
            &baseline,
            cursor,
            &op(&a, EditMode::ResizeAndShrinkOthers),
            &config,
        )
        .unwrap();
        let result = scheduled(&out, day("2025-05-10"));
        assert_eq!(result[0], ("a".into(), 60, 110));
        // every block keeps at least the minimal duration
        for (_, _, duration) in &result {
            assert!(*duration >= config.edit.minimal_duration_minutes);
        }
        // and the day is overlap-free
        for pair in result.windows(2) {
            assert!(pair[0].1 + pair[0].2 <= pair[1].1);
        }
    }

    #[test]
    fn test_create_inserts_transient_block() {
        let baseline = table(vec![block("a", 60, 30)]);
        let cursor = Cursor::new(day("2025-05-11"), 600);
        let config = PlannerConfig::default();
        let new = TimeBlock::new("new", "- Fresh block", day("2025-05-10"), 0, 0);

        let out = transform(
            &baseline,
            cursor,
            &op(&new, EditMode::Create),
            &config,
        )
        .unwrap();
        assert_eq!(
            scheduled(&out, day("2025-05-11")),
            vec![("new".into(), 600, config.edit.default_duration_minutes)]
        );
        let created = out.find_block("new").unwrap().2;
        assert!(created.location.is_none());
    }

    #[test]
    fn test_delete_removes_target() {
        let a = block("a", 60, 30);
        let baseline = table(vec![a.clone(), block("b", 120, 30)]);
        let cursor = Cursor::new(day("2025-05-10"), 60);
        let config = PlannerConfig::default();

        let out = transform(&baseline, cursor, &op(&a, EditMode::Delete), &config).unwrap();
        assert_eq!(
            scheduled(&out, day("2025-05-10")),
            vec![("b".into(), 120, 30)]
        );
    }

    #[test]
    fn test_schedule_moves_unscheduled_to_cursor() {
        let mut baseline = DayTable::new();
        baseline.insert_day(day("2025-05-10"), TimeBlockSet::default());
        let milk = TimeBlock::new("milk", "- Buy milk", day("2025-05-10"), 0, 30);
        baseline.insert_unscheduled(day("2025-05-10"), milk.clone());

        let cursor = Cursor::new(day("2025-05-11"), 17 * 60);
        let config = PlannerConfig::default();
        let out = transform(&baseline, cursor, &op(&milk, EditMode::Schedule), &config).unwrap();

        assert!(out.get(day("2025-05-10")).unwrap().unscheduled.is_empty());
        assert_eq!(
            scheduled(&out, day("2025-05-11")),
            vec![("milk".into(), 17 * 60, 30)]
        );
    }

    #[test]
    fn test_schedule_rejects_scheduled_target() {
        let a = block("a", 60, 30);
        let baseline = table(vec![a.clone()]);
        let cursor = Cursor::new(day("2025-05-10"), 600);
        let config = PlannerConfig::default();

        let err = transform(&baseline, cursor, &op(&a, EditMode::Schedule), &config)
            .unwrap_err();
        assert_eq!(err, EditError::NotUnscheduled { id: "a".into() });
    }

    #[test]
    fn test_remote_target_is_rejected() {
        let mut meeting = block("cal", 540, 60);
        meeting.remote = true;
        let baseline = table(vec![meeting.clone()]);
        let cursor = Cursor::new(day("2025-05-10"), 600);
        let config = PlannerConfig::default();

        let err = transform(&baseline, cursor, &op(&meeting, EditMode::Drag), &config)
            .unwrap_err();
        assert_eq!(err, EditError::RemoteBlock { id: "cal".into() });
    }

    #[test]
    fn test_remote_neighbors_never_move() {
        let a = block("a", 60, 60);
        let mut meeting = block("cal", 100, 60);
        meeting.remote = true;
        let baseline = table(vec![a.clone(), meeting]);
        let cursor = Cursor::new(day("2025-05-10"), 80);
        let config = PlannerConfig::default();

        let out = transform(
            &baseline,
            cursor,
            &op(&a, EditMode::DragAndShiftOthers),
            &config,
        )
        .unwrap();
        let remote = out.find_block("cal").unwrap().2;
        assert_eq!(remote.start_minutes, 100);
        assert_eq!(remote.duration_minutes, 60);
    }

    #[test]
    fn test_unknown_target_fails() {
        let baseline = table(vec![block("a", 60, 30)]);
        let cursor = Cursor::new(day("2025-05-10"), 60);
        let config = PlannerConfig::default();
        let ghost = block("ghost", 0, 30);

        let err = transform(&baseline, cursor, &op(&ghost, EditMode::Drag), &config)
            .unwrap_err();
        assert_eq!(err, EditError::BlockNotFound { id: "ghost".into() });
    }
}
