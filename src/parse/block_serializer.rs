use crate::model::block::TimeBlock;
use crate::parse::timestamp;

/// Re-render a block's first line from its current state: the leading time
/// range for scheduled blocks (inserted when the line has none), stripped
/// for unscheduled ones. An in-text scheduled-date marker is refreshed to
/// the block's day.
pub fn render_first_line(block: &TimeBlock, scheduled: bool) -> String {
    let line = if scheduled {
        timestamp::set_time_range_in_line(
            block.first_line(),
            block.start_minutes,
            block.end_minutes(),
        )
    } else {
        timestamp::strip_time_range(block.first_line())
    };
    timestamp::set_scheduled_day_in_text(&line, block.day)
}

/// The block's full markdown: re-rendered first line plus continuation
/// lines verbatim.
pub fn render_block(block: &TimeBlock, scheduled: bool) -> String {
    let mut out = render_first_line(block, scheduled);
    for line in block.text.lines().skip(1) {
        out.push('\n');
        out.push_str(line);
    }
    out
}
