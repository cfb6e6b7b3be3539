use indexmap::IndexMap;

use crate::model::block::TimeBlock;
use crate::model::day_table::DayTable;
use crate::parse::timestamp;

/// A block flattened out of the day table together with the bucket it sat
/// in. Scheduledness travels with the block because the patch layer renders
/// first lines differently for timed and untimed items.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBlock {
    pub block: TimeBlock,
    pub scheduled: bool,
}

impl FlatBlock {
    pub fn new(block: TimeBlock, scheduled: bool) -> Self {
        FlatBlock { block, scheduled }
    }

    fn same_representation(&self, other: &FlatBlock) -> bool {
        self.block == other.block && self.scheduled == other.scheduled
    }
}

/// The classified difference between two snapshots of editable blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDiff {
    pub deleted: Vec<FlatBlock>,
    pub updated: Vec<FlatBlock>,
    pub created: Vec<FlatBlock>,
}

impl BlockDiff {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.updated.is_empty() && self.created.is_empty()
    }
}

/// Flatten a table's editable blocks in table order. Remote blocks never
/// reach the diff.
pub fn flatten_editable(table: &DayTable) -> Vec<FlatBlock> {
    let mut flat = Vec::new();
    for (_, set) in table.iter() {
        for block in &set.scheduled {
            if !block.remote {
                flat.push(FlatBlock::new(block.clone(), true));
            }
        }
        for block in &set.unscheduled {
            if !block.remote {
                flat.push(FlatBlock::new(block.clone(), false));
            }
        }
    }
    flat
}

/// Join two snapshots by id and classify what changed.
///
/// New ids are `created`. A changed block that moved to another day is
/// normally a cross-file operation and comes back as `deleted` at the
/// origin plus `created` at the destination with its location stripped;
/// a block whose day is pinned by an in-text date marker stays in its file
/// and is `updated` instead, like any same-day change. Ids present only in
/// the baseline are not reported: explicit deletions are injected by the
/// edit session, which knows about the delete gesture.
pub fn diff_blocks(baseline: &[FlatBlock], next: &[FlatBlock]) -> BlockDiff {
    let by_id: IndexMap<&str, &FlatBlock> = baseline
        .iter()
        .map(|flat| (flat.block.id.as_str(), flat))
        .collect();

    let mut diff = BlockDiff::default();
    for flat in next {
        let Some(base) = by_id.get(flat.block.id.as_str()) else {
            diff.created.push(flat.clone());
            continue;
        };
        if base.same_representation(flat) {
            continue;
        }
        let moved_day = base.block.day != flat.block.day;
        let pinned = timestamp::scheduled_day_in_text(&flat.block.text).is_some();
        if moved_day && !pinned {
            diff.deleted.push((*base).clone());
            let mut created = flat.clone();
            created.block.location = None;
            diff.created.push(created);
        } else {
            diff.updated.push(flat.clone());
        }
    }
    diff
}
