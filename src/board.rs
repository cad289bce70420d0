use rand::Rng;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use crate::bingo::{self, BoardReport, CellSnapshot, SessionAchievements, Tier};
use crate::cell::{create_cell, Cell, CellEvent, CellOptions, Notifier};
use crate::celebration::{Effect, EffectSink, Origin};
use crate::error::CellError;
use crate::grid::{assemble_layout, AssemblyStatus, GridPosition, CELL_COUNT};
use crate::schedule::{Scheduler, TimerTick};
use crate::word::WordEntry;

/// A dealt 5x5 grid and everything that lives as long as it does: the cells,
/// the tiers already celebrated, and the channel cells report through.
pub struct Board {
    cells: [Option<Cell>; CELL_COUNT],
    status: AssemblyStatus,
    achievements: SessionAchievements,
    events: Receiver<CellEvent>,
    notifier: Notifier,
    scheduler: Rc<dyn Scheduler>,
    options: CellOptions,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("status", &self.status)
            .field("achievements", &self.achievements)
            .finish_non_exhaustive()
    }
}

impl Board {
    pub fn assemble<R: Rng + ?Sized>(
        entries: &[WordEntry],
        rng: &mut R,
        scheduler: Rc<dyn Scheduler>,
        options: CellOptions,
    ) -> Result<Self, CellError> {
        let (tx, events) = mpsc::channel();
        let mut board = Self {
            cells: std::array::from_fn(|_| None),
            status: AssemblyStatus::Insufficient {
                filled: 0,
                missing: CELL_COUNT,
            },
            achievements: SessionAchievements::new(),
            events,
            notifier: Notifier::new(tx),
            scheduler,
            options,
        };
        board.reassemble(entries, rng)?;
        Ok(board)
    }

    /// Deals a fresh grid: old cells are destroyed (cancelling their timers)
    /// and the celebrated tiers start over.
    pub fn reassemble<R: Rng + ?Sized>(
        &mut self,
        entries: &[WordEntry],
        rng: &mut R,
    ) -> Result<(), CellError> {
        for cell in self.cells.iter_mut().filter_map(Option::take) {
            cell.destroy();
        }
        self.events.try_iter().for_each(drop);
        self.achievements = SessionAchievements::new();

        let layout = assemble_layout(entries, rng);
        self.status = layout.status;
        for (index, slot) in layout.into_slots().into_iter().enumerate() {
            if let Some(entry) = slot {
                self.cells[index] = Some(create_cell(
                    index,
                    entry,
                    self.notifier.clone(),
                    Rc::clone(&self.scheduler),
                    self.options,
                )?);
            }
        }

        log::info!("dealt a new grid from {} entries: {:?}", entries.len(), self.status);
        Ok(())
    }

    pub fn status(&self) -> AssemblyStatus {
        self.status
    }

    pub fn achievements(&self) -> &SessionAchievements {
        &self.achievements
    }

    pub fn cell(&self, position: GridPosition) -> Option<&Cell> {
        self.cells[position.index()].as_ref()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn snapshots(&self) -> [CellSnapshot; CELL_COUNT] {
        std::array::from_fn(|i| {
            self.cells[i]
                .as_ref()
                .map(Cell::snapshot)
                .unwrap_or(CellSnapshot::VACANT)
        })
    }

    pub fn report(&self) -> BoardReport {
        bingo::report(&self.snapshots())
    }

    /// Click / Enter on a position. Returns the tier this fired, if any.
    pub fn primary(
        &mut self,
        position: GridPosition,
        origin: Option<Origin>,
        sink: &mut dyn EffectSink,
    ) -> Option<Tier> {
        let cell = self.cells[position.index()].as_mut()?;
        cell.primary_activate(origin);
        self.settle(sink)
    }

    /// Right click / disable gesture on a position.
    pub fn secondary(&mut self, position: GridPosition, sink: &mut dyn EffectSink) -> Option<Tier> {
        let cell = self.cells[position.index()].as_mut()?;
        cell.secondary_activate();
        self.settle(sink)
    }

    pub fn on_timer_tick(&mut self, tick: TimerTick, sink: &mut dyn EffectSink) -> Option<Tier> {
        let cell = self.cells[tick.position.index()].as_mut()?;
        cell.on_timer_tick(tick);
        self.settle(sink)
    }

    /// Forwards queued cell effects and evaluates once per reported change.
    fn settle(&mut self, sink: &mut dyn EffectSink) -> Option<Tier> {
        let mut fired = None;
        while let Ok(event) = self.events.try_recv() {
            match event {
                CellEvent::Effect(effect) => sink.fire(effect),
                CellEvent::Reevaluate => {
                    if let Some(tier) = bingo::evaluate(&self.snapshots(), &mut self.achievements)
                    {
                        sink.fire(Effect::Tier(tier));
                        fired = Some(tier);
                    }
                }
            }
        }
        fired
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        for cell in self.cells.iter_mut().filter_map(Option::take) {
            cell.destroy();
        }
    }
}
