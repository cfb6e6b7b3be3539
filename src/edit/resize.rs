//! Edge resizes. Both clamp to the configured minimum duration and touch
//! only the target block; neighbor settling is the cascade's job.

use crate::model::block::TimeBlock;

/// Bottom-edge resize: the cursor sets the block's end.
pub fn resize_bottom(block: &mut TimeBlock, cursor_minutes: i64, minimal: i64) {
    block.duration_minutes = (cursor_minutes - block.start_minutes).max(minimal);
}

/// Top-edge resize: the cursor sets the block's start while the end stays
/// fixed, so the start can never pass `end - minimal`.
pub fn resize_top(block: &mut TimeBlock, cursor_minutes: i64, minimal: i64) {
    let end = block.end_minutes();
    let start = cursor_minutes.min(end - minimal);
    block.start_minutes = start;
    block.duration_minutes = end - start;
}
