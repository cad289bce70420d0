use super::{Behavior, CellContext};
use crate::celebration::Origin;
use crate::word::WordKind;

/// Free space: toggles like a field but without confetti, and cannot be
/// disabled.
#[derive(Debug)]
pub struct FreeCell {
    marked: bool,
}

impl FreeCell {
    pub fn new(premarked: bool) -> Self {
        Self { marked: premarked }
    }
}

impl Behavior for FreeCell {
    fn kind(&self) -> WordKind {
        WordKind::Free
    }

    fn primary(&mut self, ctx: &CellContext, _origin: Option<Origin>) {
        self.marked = !self.marked;
        log::debug!("free {} marked={}", ctx.position, self.marked);
        ctx.notifier.reevaluate();
    }

    fn secondary(&mut self, _ctx: &CellContext) {}

    fn marked(&self) -> bool {
        self.marked
    }

    fn disabled(&self) -> bool {
        false
    }
}
