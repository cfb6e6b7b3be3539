use chrono::NaiveDate;
use indexmap::IndexMap;

use super::block::TimeBlock;

/// One day's blocks: timeboxed items and items without a fixed time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeBlockSet {
    /// Blocks with a start time, in note order
    pub scheduled: Vec<TimeBlock>,
    /// Blocks without a fixed time (the SCHEDULE gesture's source set)
    pub unscheduled: Vec<TimeBlock>,
}

impl TimeBlockSet {
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty() && self.unscheduled.is_empty()
    }
}

/// Which bucket of a `TimeBlockSet` a block sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Scheduled,
    Unscheduled,
}

/// Ordered day → blocks table. All cross-day movement goes through
/// `move_block_to_day` so the remove/insert pair can never go out of sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTable {
    days: IndexMap<NaiveDate, TimeBlockSet>,
}

impl DayTable {
    pub fn new() -> Self {
        DayTable::default()
    }

    pub fn get(&self, day: NaiveDate) -> Option<&TimeBlockSet> {
        self.days.get(&day)
    }

    /// The bucket for `day`, created empty if absent
    pub fn bucket_mut(&mut self, day: NaiveDate) -> &mut TimeBlockSet {
        self.days.entry(day).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &TimeBlockSet)> {
        self.days.iter().map(|(day, set)| (*day, set))
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn insert_scheduled(&mut self, day: NaiveDate, mut block: TimeBlock) {
        block.day = day;
        self.bucket_mut(day).scheduled.push(block);
    }

    pub fn insert_unscheduled(&mut self, day: NaiveDate, mut block: TimeBlock) {
        block.day = day;
        self.bucket_mut(day).unscheduled.push(block);
    }

    /// Insert a whole parsed day at once
    pub fn insert_day(&mut self, day: NaiveDate, set: TimeBlockSet) {
        self.days.insert(day, set);
    }

    /// Find a block by id anywhere in the table
    pub fn find_block(&self, id: &str) -> Option<(NaiveDate, Bucket, &TimeBlock)> {
        for (day, set) in &self.days {
            if let Some(block) = set.scheduled.iter().find(|b| b.id == id) {
                return Some((*day, Bucket::Scheduled, block));
            }
            if let Some(block) = set.unscheduled.iter().find(|b| b.id == id) {
                return Some((*day, Bucket::Unscheduled, block));
            }
        }
        None
    }

    /// Remove a block by id, returning it with its origin day and bucket
    pub fn remove_block(&mut self, id: &str) -> Option<(NaiveDate, Bucket, TimeBlock)> {
        for (day, set) in &mut self.days {
            if let Some(pos) = set.scheduled.iter().position(|b| b.id == id) {
                return Some((*day, Bucket::Scheduled, set.scheduled.remove(pos)));
            }
            if let Some(pos) = set.unscheduled.iter().position(|b| b.id == id) {
                return Some((*day, Bucket::Unscheduled, set.unscheduled.remove(pos)));
            }
        }
        None
    }

    /// Move a block to another day, keeping its bucket kind.
    /// Returns `false` if no block with that id exists. Moving a block to
    /// the day it is already on is a no-op that still returns `true`.
    pub fn move_block_to_day(&mut self, id: &str, dest: NaiveDate) -> bool {
        match self.find_block(id) {
            Some((day, _, _)) if day == dest => true,
            Some(_) => {
                let (_, bucket, mut block) = self.remove_block(id).unwrap();
                block.day = dest;
                match bucket {
                    Bucket::Scheduled => self.bucket_mut(dest).scheduled.push(block),
                    Bucket::Unscheduled => self.bucket_mut(dest).unscheduled.push(block),
                }
                true
            }
            None => false,
        }
    }
}
