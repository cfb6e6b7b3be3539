use crate::edit::diff::{diff_blocks, flatten_editable, BlockDiff};
use crate::edit::transform::{transform, Cursor, EditError, EditMode, EditOperation};
use crate::model::config::PlannerConfig;
use crate::model::day_table::DayTable;

#[derive(Debug, Clone)]
struct ActiveEdit {
    operation: EditOperation,
    cursor: Cursor,
}

/// Owns the single in-progress edit and the baseline it edits against.
///
/// Idle is the only initial and terminal state. `begin` enters a gesture,
/// `cancel` discards it, `confirm` computes the final diff and returns to
/// idle. The baseline never changes during a gesture; after the host has
/// persisted a diff and re-read its notes it installs the fresh table with
/// `replace_baseline`.
#[derive(Debug, Clone)]
pub struct EditSession {
    config: PlannerConfig,
    baseline: DayTable,
    active: Option<ActiveEdit>,
    sync_in_progress: bool,
}

impl EditSession {
    pub fn new(baseline: DayTable, config: PlannerConfig) -> Self {
        EditSession {
            config,
            baseline,
            active: None,
            sync_in_progress: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn baseline(&self) -> &DayTable {
        &self.baseline
    }

    /// Start a gesture at the given cursor position.
    pub fn begin(&mut self, operation: EditOperation, cursor: Cursor) -> Result<(), EditError> {
        if self.active.is_some() {
            return Err(EditError::EditInProgress);
        }
        if self.sync_in_progress {
            return Err(EditError::SyncInProgress);
        }
        if operation.mode != EditMode::Create {
            let id = operation.block.id.as_str();
            let (_, _, target) = self
                .baseline
                .find_block(id)
                .ok_or_else(|| EditError::BlockNotFound { id: id.to_string() })?;
            if target.remote {
                return Err(EditError::RemoteBlock { id: id.to_string() });
            }
        }
        self.active = Some(ActiveEdit { operation, cursor });
        Ok(())
    }

    /// Track the pointer. Ignored when no gesture is active.
    pub fn update_cursor(&mut self, cursor: Cursor) {
        if let Some(active) = &mut self.active {
            active.cursor = cursor;
        }
    }

    /// The table the host should render right now: the transform output
    /// while a gesture is active, the baseline otherwise.
    pub fn view(&self) -> Result<DayTable, EditError> {
        match &self.active {
            Some(active) => transform(&self.baseline, active.cursor, &active.operation, &self.config),
            None => Ok(self.baseline.clone()),
        }
    }

    /// Discard the in-progress gesture. Synchronous and total: nothing of
    /// the transform output survives.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Finish the gesture: compute the final table, diff it against the
    /// baseline and return to idle. The diff is returned even when nothing
    /// changed. Delete gestures inject their target into `deleted` here,
    /// since the diff join alone never reports baseline-only ids.
    pub fn confirm(&mut self) -> Result<BlockDiff, EditError> {
        let Some(active) = self.active.take() else {
            return Err(EditError::NoActiveEdit);
        };
        let next = transform(&self.baseline, active.cursor, &active.operation, &self.config)?;

        let baseline_flat = flatten_editable(&self.baseline);
        let next_flat = flatten_editable(&next);
        let mut diff = diff_blocks(&baseline_flat, &next_flat);

        if active.operation.mode == EditMode::Delete {
            let id = active.operation.block.id.as_str();
            if let Some(target) = baseline_flat.iter().find(|f| f.block.id == id) {
                diff.deleted.push(target.clone());
            }
        }
        Ok(diff)
    }

    /// External sync guard: while set, no new gesture may begin.
    pub fn set_sync_in_progress(&mut self, flag: bool) {
        self.sync_in_progress = flag;
    }

    /// Install a freshly loaded table. Only allowed while idle.
    pub fn replace_baseline(&mut self, baseline: DayTable) -> Result<(), EditError> {
        if self.active.is_some() {
            return Err(EditError::EditInProgress);
        }
        self.baseline = baseline;
        Ok(())
    }
}
