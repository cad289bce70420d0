use std::rc::Rc;

use super::{Behavior, Cell, CellContext, FieldCell, FreeCell, Notifier, TimerCell};
use crate::error::CellError;
use crate::grid::GridPosition;
use crate::schedule::Scheduler;
use crate::word::{WordEntry, WordKind, DEFAULT_TIMER_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellOptions {
    pub free_premarked: bool,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            free_premarked: true,
        }
    }
}

/// Builds the cell for `entry` at `index`. The entry's kind is already
/// normalised by ingestion, so this is the single place that switches on it.
pub fn create_cell(
    index: usize,
    entry: WordEntry,
    notifier: Notifier,
    scheduler: Rc<dyn Scheduler>,
    options: CellOptions,
) -> Result<Cell, CellError> {
    let position = GridPosition::new(index).ok_or_else(|| {
        log::error!("refusing to build a cell at position {index}");
        CellError::InvariantViolation { position: index }
    })?;

    let behavior: Box<dyn Behavior> = match entry.kind {
        WordKind::Field => Box::new(FieldCell::new()),
        WordKind::Free => Box::new(FreeCell::new(options.free_premarked)),
        WordKind::Timer => Box::new(TimerCell::new(
            entry.timer_seconds().unwrap_or(DEFAULT_TIMER_SECS),
        )),
    };

    let ctx = CellContext {
        position,
        notifier,
        scheduler,
    };
    Ok(Cell::new(entry, ctx, behavior))
}
