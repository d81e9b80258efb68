//! Stop training on a non-finite epoch loss

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

#[derive(Clone, Copy, Debug, Default)]
pub struct TerminateOnNan;

impl TrainerCallback for TerminateOnNan {
    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if ctx.loss.is_finite() {
            CallbackAction::Continue
        } else {
            tracing::error!(epoch = ctx.epoch, loss = ctx.loss, "non-finite loss, stopping");
            CallbackAction::Stop
        }
    }

    fn name(&self) -> &'static str {
        "TerminateOnNan"
    }
}
