//! Progress logging through `tracing`

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

#[derive(Clone, Debug)]
pub struct ProgressCallback {
    /// Log every N steps
    log_interval: usize,
}

impl ProgressCallback {
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        tracing::debug!(
            epoch = ctx.epoch + 1,
            max_epochs = ctx.max_epochs,
            lr = ctx.lr,
            "epoch starting"
        );
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        tracing::info!(
            "Epoch {}/{}: loss {:.4}, accuracy {:.4} ({:.1}s)",
            ctx.epoch + 1,
            ctx.max_epochs,
            ctx.loss,
            ctx.accuracy,
            ctx.elapsed_secs
        );
        CallbackAction::Continue
    }

    fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if (ctx.step + 1) % self.log_interval == 0 {
            tracing::debug!(
                "  step {}/{}: loss {:.4}, accuracy {:.4}",
                ctx.step + 1,
                ctx.steps_per_epoch,
                ctx.loss,
                ctx.accuracy
            );
        }
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_never_stops_training() {
        let mut progress = ProgressCallback::new(5);
        let ctx = CallbackContext {
            max_epochs: 10,
            step: 4,
            steps_per_epoch: 100,
            loss: 0.5,
            lr: 0.001,
            ..Default::default()
        };

        assert_eq!(progress.on_epoch_begin(&ctx), CallbackAction::Continue);
        assert_eq!(progress.on_step_end(&ctx), CallbackAction::Continue);
        assert_eq!(progress.on_epoch_end(&ctx), CallbackAction::Continue);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        assert_eq!(ProgressCallback::new(0).log_interval, 1);
        assert_eq!(ProgressCallback::default().log_interval, 10);
    }
}
