//! Per-position interactive state.
//!
//! A [`Cell`] wraps one of three behaviors (field, free space, countdown
//! timer). Cells never evaluate the board themselves; they report through a
//! [`Notifier`] handed to them at construction and the owner drains those
//! events after each interaction.

mod factory;
mod field;
mod free;
mod timer;

use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::Sender;

pub use factory::{create_cell, CellOptions};
pub use field::FieldCell;
pub use free::FreeCell;
pub use timer::{TimerCell, TimerPhase, TimerState};

use crate::bingo::CellSnapshot;
use crate::celebration::{Effect, Origin};
use crate::grid::GridPosition;
use crate::schedule::{Scheduler, TimerTick};
use crate::word::{WordEntry, WordKind};

/// What a cell reports upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEvent {
    Effect(Effect),
    /// Mark or disabled state changed; the board must be evaluated again.
    Reevaluate,
}

/// Channel end through which cells report to their board.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Sender<CellEvent>,
}

impl Notifier {
    pub fn new(tx: Sender<CellEvent>) -> Self {
        Self { tx }
    }

    pub fn notify(&self, event: CellEvent) {
        // the board may already be gone while a cell is torn down
        let _ = self.tx.send(event);
    }

    pub fn effect(&self, effect: Effect) {
        self.notify(CellEvent::Effect(effect));
    }

    pub fn reevaluate(&self) {
        self.notify(CellEvent::Reevaluate);
    }
}

/// Dependencies every behavior receives with each call.
pub struct CellContext {
    pub position: GridPosition,
    pub notifier: Notifier,
    pub scheduler: Rc<dyn Scheduler>,
}

impl fmt::Debug for CellContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellContext")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// One of the three cell variants.
pub trait Behavior: fmt::Debug {
    fn kind(&self) -> WordKind;
    fn primary(&mut self, ctx: &CellContext, origin: Option<Origin>);
    fn secondary(&mut self, ctx: &CellContext);
    fn marked(&self) -> bool;
    fn disabled(&self) -> bool;

    fn on_tick(&mut self, _ctx: &CellContext, _ticket: u64) {}

    fn timer(&self) -> Option<TimerState> {
        None
    }

    /// Releases anything that outlives a single call (scheduled ticks).
    fn destroy(&mut self) {}
}

/// Read-only view of a cell for rendering and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    pub position: GridPosition,
    pub kind: WordKind,
    pub marked: bool,
    pub disabled: bool,
    pub timer: Option<TimerState>,
}

impl CellState {
    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot::new(self.marked, self.disabled)
    }
}

#[derive(Debug)]
pub struct Cell {
    entry: WordEntry,
    ctx: CellContext,
    behavior: Box<dyn Behavior>,
}

impl Cell {
    fn new(entry: WordEntry, ctx: CellContext, behavior: Box<dyn Behavior>) -> Self {
        Self {
            entry,
            ctx,
            behavior,
        }
    }

    pub fn position(&self) -> GridPosition {
        self.ctx.position
    }

    pub fn entry(&self) -> &WordEntry {
        &self.entry
    }

    pub fn state(&self) -> CellState {
        CellState {
            position: self.ctx.position,
            kind: self.behavior.kind(),
            marked: self.behavior.marked(),
            disabled: self.behavior.disabled(),
            timer: self.behavior.timer(),
        }
    }

    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot::new(self.behavior.marked(), self.behavior.disabled())
    }

    pub fn primary_activate(&mut self, origin: Option<Origin>) {
        self.behavior.primary(&self.ctx, origin);
    }

    pub fn secondary_activate(&mut self) {
        self.behavior.secondary(&self.ctx);
    }

    /// Delivers a timer beat. Beats addressed to another position are ignored.
    pub fn on_timer_tick(&mut self, tick: TimerTick) {
        if tick.position == self.ctx.position {
            self.behavior.on_tick(&self.ctx, tick.ticket);
        }
    }

    pub fn destroy(mut self) {
        self.behavior.destroy();
        log::debug!("cell {} destroyed", self.ctx.position);
    }
}
