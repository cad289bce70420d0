use super::{Behavior, CellContext};
use crate::celebration::{Effect, Origin};
use crate::schedule::TickHandle;
use crate::word::WordKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TimerPhase {
    Ready,
    Running,
    Paused,
    Completed,
    /// `completed` keeps the finished look (and mark) of a completed timer.
    Disabled { completed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub remaining: u32,
    pub duration: u32,
    pub phase: TimerPhase,
}

/// Countdown cell. A completed countdown counts as marked.
///
/// ```text
/// Ready --primary--> Running --primary--> Paused --primary--> Running
/// Running --0s--> Completed --primary--> Ready
/// Completed --secondary--> Disabled{completed}
/// Ready/Running/Paused --secondary--> Disabled (progress cleared)
/// Disabled --secondary--> Ready
/// ```
#[derive(Debug)]
pub struct TimerCell {
    duration: u32,
    remaining: u32,
    phase: TimerPhase,
    ticks: Option<TickHandle>,
}

impl TimerCell {
    pub fn new(duration: u32) -> Self {
        let duration = duration.max(1);
        Self {
            duration,
            remaining: duration,
            phase: TimerPhase::Ready,
            ticks: None,
        }
    }

    fn start(&mut self, ctx: &CellContext) {
        self.phase = TimerPhase::Running;
        self.ticks = Some(ctx.scheduler.every_second(ctx.position));
        log::debug!("timer {} running, {}s left", ctx.position, self.remaining);
    }

    fn stop_ticking(&mut self) {
        if let Some(handle) = self.ticks.take() {
            handle.cancel();
        }
    }

    fn pause(&mut self, ctx: &CellContext) {
        self.stop_ticking();
        self.phase = TimerPhase::Paused;
        log::debug!("timer {} paused at {}s", ctx.position, self.remaining);
    }

    fn reset(&mut self) {
        self.stop_ticking();
        self.remaining = self.duration;
        self.phase = TimerPhase::Ready;
    }

    fn disable(&mut self, completed: bool) {
        self.stop_ticking();
        self.phase = TimerPhase::Disabled { completed };
    }
}

impl Behavior for TimerCell {
    fn kind(&self) -> WordKind {
        WordKind::Timer
    }

    fn primary(&mut self, ctx: &CellContext, _origin: Option<Origin>) {
        match self.phase {
            TimerPhase::Ready | TimerPhase::Paused => self.start(ctx),
            TimerPhase::Running => self.pause(ctx),
            TimerPhase::Completed => {
                self.reset();
                ctx.notifier.reevaluate();
            }
            TimerPhase::Disabled { .. } => {}
        }
    }

    fn secondary(&mut self, ctx: &CellContext) {
        match self.phase {
            TimerPhase::Disabled { .. } => self.reset(),
            TimerPhase::Completed => self.disable(true),
            _ => {
                self.reset();
                self.disable(false);
            }
        }
        log::debug!("timer {} now {}", ctx.position, self.phase);
        ctx.notifier.reevaluate();
    }

    fn on_tick(&mut self, ctx: &CellContext, ticket: u64) {
        let live = self.ticks.as_ref().map(TickHandle::ticket) == Some(ticket);
        if self.phase != TimerPhase::Running || !live {
            log::debug!("timer {} ignored stale tick {ticket}", ctx.position);
            return;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop_ticking();
            self.phase = TimerPhase::Completed;
            log::debug!("timer {} completed", ctx.position);
            ctx.notifier.effect(Effect::TimerComplete {
                position: ctx.position,
            });
            ctx.notifier.reevaluate();
        }
    }

    fn marked(&self) -> bool {
        matches!(
            self.phase,
            TimerPhase::Completed | TimerPhase::Disabled { completed: true }
        )
    }

    fn disabled(&self) -> bool {
        matches!(self.phase, TimerPhase::Disabled { .. })
    }

    fn timer(&self) -> Option<TimerState> {
        Some(TimerState {
            remaining: self.remaining,
            duration: self.duration,
            phase: self.phase,
        })
    }

    fn destroy(&mut self) {
        self.stop_ticking();
    }
}
