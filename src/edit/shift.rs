//! Neighbor cascades for the shift and shrink edit modes.
//!
//! All four walk a start-sorted array outward from a pivot index and settle
//! each adjacent pair in turn, so one call leaves the touched side free of
//! overlaps. They return new arrays; the inputs stay untouched.

use crate::model::block::TimeBlock;

/// Push every block after `pivot` down until no adjacent pair on that side
/// overlaps. Durations are preserved.
pub fn shift_forward(blocks: &[TimeBlock], pivot: usize) -> Vec<TimeBlock> {
    let mut out = blocks.to_vec();
    for i in pivot + 1..out.len() {
        let prev_end = out[i - 1].end_minutes();
        if out[i].start_minutes < prev_end {
            out[i].start_minutes = prev_end;
        }
    }
    out
}

/// Pull every block before `pivot` up until no adjacent pair on that side
/// overlaps. Durations are preserved.
pub fn shift_backward(blocks: &[TimeBlock], pivot: usize) -> Vec<TimeBlock> {
    let mut out = blocks.to_vec();
    for i in (0..pivot).rev() {
        let next_start = out[i + 1].start_minutes;
        if out[i].end_minutes() > next_start {
            out[i].start_minutes = next_start - out[i].duration_minutes;
        }
    }
    out
}

/// Like `shift_forward`, but each displaced block first gives up duration:
/// its end stays put until the block is down to `minimal` minutes, and only
/// then does the block as a whole move (pushing the next one in turn).
pub fn shrink_forward(blocks: &[TimeBlock], pivot: usize, minimal: i64) -> Vec<TimeBlock> {
    let mut out = blocks.to_vec();
    for i in pivot + 1..out.len() {
        let prev_end = out[i - 1].end_minutes();
        if out[i].start_minutes >= prev_end {
            continue;
        }
        let end = out[i].end_minutes();
        out[i].start_minutes = prev_end;
        out[i].duration_minutes = (end - prev_end).max(minimal);
    }
    out
}

/// Mirror of `shrink_forward` for the blocks above the pivot: starts stay
/// put while duration absorbs the overlap, then whole blocks move up.
pub fn shrink_backward(blocks: &[TimeBlock], pivot: usize, minimal: i64) -> Vec<TimeBlock> {
    let mut out = blocks.to_vec();
    for i in (0..pivot).rev() {
        let next_start = out[i + 1].start_minutes;
        if out[i].end_minutes() <= next_start {
            continue;
        }
        let start = out[i].start_minutes;
        out[i].duration_minutes = (next_start - start).max(minimal);
        out[i].start_minutes = next_start - out[i].duration_minutes;
    }
    out
}
