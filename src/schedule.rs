use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::grid::GridPosition;
use crate::runtime::BingoEvent;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// One beat of a running timer cell. `ticket` identifies the handle that
/// produced it so that beats from a cancelled handle can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub position: GridPosition,
    pub ticket: u64,
}

/// Owner side of a repeating once-per-second task. Dropping it cancels.
#[derive(Debug)]
pub struct TickHandle {
    position: GridPosition,
    ticket: u64,
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    fn new(position: GridPosition) -> Self {
        Self {
            position,
            ticket: NEXT_TICKET.fetch_add(1, Ordering::Relaxed),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn tick(&self) -> TimerTick {
        TimerTick {
            position: self.position,
            ticket: self.ticket,
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts once-per-second beats for timer cells.
pub trait Scheduler {
    fn every_second(&self, position: GridPosition) -> TickHandle;
}

/// Production scheduler: one background thread per running timer, feeding
/// beats into the application's event channel.
#[derive(Debug, Clone)]
pub struct ThreadScheduler {
    tx: Sender<BingoEvent>,
    period: Duration,
}

impl ThreadScheduler {
    pub fn new(tx: Sender<BingoEvent>) -> Self {
        Self::with_period(tx, Duration::from_secs(1))
    }

    pub fn with_period(tx: Sender<BingoEvent>, period: Duration) -> Self {
        Self { tx, period }
    }
}

impl Scheduler for ThreadScheduler {
    fn every_second(&self, position: GridPosition) -> TickHandle {
        let handle = TickHandle::new(position);
        let cancelled = Arc::clone(&handle.cancelled);
        let tick = handle.tick();
        let tx = self.tx.clone();
        let period = self.period;

        thread::spawn(move || loop {
            thread::sleep(period);
            if cancelled.load(Ordering::Acquire) {
                break;
            }
            if tx.send(BingoEvent::Timer(tick)).is_err() {
                break;
            }
        });

        handle
    }
}

/// Test scheduler: hands out handles and lets the caller decide when a beat
/// happens.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    issued: RefCell<Vec<(TimerTick, Arc<AtomicBool>)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Beats of every handle that has not been cancelled yet.
    pub fn live_ticks(&self) -> Vec<TimerTick> {
        self.issued
            .borrow()
            .iter()
            .filter(|(_, cancelled)| !cancelled.load(Ordering::Acquire))
            .map(|(tick, _)| *tick)
            .collect()
    }

    /// Every beat ever issued, including cancelled ones.
    pub fn all_ticks(&self) -> Vec<TimerTick> {
        self.issued.borrow().iter().map(|(tick, _)| *tick).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn every_second(&self, position: GridPosition) -> TickHandle {
        let handle = TickHandle::new(position);
        self.issued
            .borrow_mut()
            .push((handle.tick(), Arc::clone(&handle.cancelled)));
        handle
    }
}
