use super::{Behavior, CellContext};
use crate::celebration::{Effect, Origin};
use crate::word::WordKind;

/// Ordinary cell: primary toggles the mark (with a confetti burst when it
/// becomes marked), secondary toggles disabled.
#[derive(Debug, Default)]
pub struct FieldCell {
    marked: bool,
    disabled: bool,
}

impl FieldCell {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for FieldCell {
    fn kind(&self) -> WordKind {
        WordKind::Field
    }

    fn primary(&mut self, ctx: &CellContext, origin: Option<Origin>) {
        self.marked = !self.marked;
        log::debug!("field {} marked={}", ctx.position, self.marked);
        if self.marked {
            ctx.notifier.effect(Effect::Mark {
                position: ctx.position,
                origin,
            });
        }
        ctx.notifier.reevaluate();
    }

    fn secondary(&mut self, ctx: &CellContext) {
        self.disabled = !self.disabled;
        log::debug!("field {} disabled={}", ctx.position, self.disabled);
        ctx.notifier.reevaluate();
    }

    fn marked(&self) -> bool {
        self.marked
    }

    fn disabled(&self) -> bool {
        self.disabled
    }
}
