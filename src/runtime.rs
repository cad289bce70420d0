use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent, MouseEventKind};

use crate::schedule::TimerTick;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum BingoEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// Animation frame
    Tick,
    /// One second elapsed for a running timer cell
    Timer(TimerTick),
}

/// Source of terminal events (keyboard, mouse, resize, timer beats)
pub trait BingoEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<BingoEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<BingoEvent>,
    rx: Receiver<BingoEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => Some(BingoEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) if is_click(&mouse) => Some(BingoEvent::Mouse(mouse)),
                Ok(CtEvent::Resize(_, _)) => Some(BingoEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };
            if let Some(ev) = forwarded {
                if input_tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { tx, rx }
    }

    /// Sender for other producers (timer threads) feeding the same loop.
    pub fn sender(&self) -> Sender<BingoEvent> {
        self.tx.clone()
    }
}

fn is_click(mouse: &MouseEvent) -> bool {
    matches!(mouse.kind, MouseEventKind::Down(_))
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BingoEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<BingoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<BingoEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<BingoEvent>) -> Self {
        Self { rx }
    }
}

impl BingoEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<BingoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: BingoEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: BingoEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn event_source(&self) -> &E {
        &self.event_source
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> BingoEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                BingoEvent::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPosition;
    use crossterm::event::{KeyModifiers, MouseButton};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            BingoEvent::Tick => {}
            other => panic!("expected Tick on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_timer_beats() {
        let (tx, rx) = mpsc::channel();
        let beat = TimerTick {
            position: GridPosition::new(8).unwrap(),
            ticket: 42,
        };
        tx.send(BingoEvent::Timer(beat)).unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(10)),
        );

        match runner.step() {
            BingoEvent::Timer(tick) => assert_eq!(tick, beat),
            other => panic!("expected Timer event, got {other:?}"),
        }
    }

    #[test]
    fn only_button_presses_count_as_clicks() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            ..click
        };
        assert!(is_click(&click));
        assert!(!is_click(&moved));
    }
}
