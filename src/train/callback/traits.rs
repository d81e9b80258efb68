//! Core traits and types for the callback system
//!
//! - `CallbackContext` - State passed to callbacks
//! - `CallbackAction` - Actions a callback can request
//! - `TrainerCallback` - The trait all callbacks implement

use crate::network::Network;
use crate::Result;

/// Snapshot of training state handed to every hook
#[derive(Clone, Debug, Default)]
pub struct CallbackContext {
    /// Current epoch (0-indexed, continues from the initial epoch on resume)
    pub epoch: usize,
    /// Epoch at which training ends (exclusive)
    pub max_epochs: usize,
    /// Current step within epoch
    pub step: usize,
    pub steps_per_epoch: usize,
    /// Optimizer steps taken in this fit call
    pub global_step: usize,
    /// Batch loss in step hooks, mean epoch loss in epoch hooks
    pub loss: f32,
    /// Label accuracy matching `loss`
    pub accuracy: f32,
    /// Effective learning rate
    pub lr: f32,
    pub best_loss: Option<f32>,
    pub elapsed_secs: f64,
}

/// Action to take after a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    Continue,
    /// Stop training after the current hook
    Stop,
    /// Skip rest of current epoch
    SkipEpoch,
}

/// Hooks into the fit loop. Every method defaults to a no-op.
pub trait TrainerCallback: Send {
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    fn on_train_end(&mut self, _ctx: &CallbackContext) {}

    fn on_epoch_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    fn on_step_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    fn on_step_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after `on_epoch_end` with the network's current weights.
    /// Errors abort the fit call.
    fn on_weights(&mut self, _ctx: &CallbackContext, _network: &dyn Network) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::TargetLayout;
    use crate::network::{LinearNetwork, Stage};

    #[test]
    fn test_callback_context_default() {
        let ctx = CallbackContext::default();
        assert_eq!(ctx.epoch, 0);
        assert_eq!(ctx.loss, 0.0);
        assert!(ctx.best_loss.is_none());
    }

    #[test]
    fn test_default_trainer_callback_impl() {
        struct MinimalCallback;
        impl TrainerCallback for MinimalCallback {}

        let mut cb = MinimalCallback;
        let ctx = CallbackContext::default();
        let net = LinearNetwork::new(Stage::Proposal, 2, TargetLayout::new(0), 0);
        assert_eq!(cb.on_train_begin(&ctx), CallbackAction::Continue);
        assert_eq!(cb.on_epoch_begin(&ctx), CallbackAction::Continue);
        assert_eq!(cb.on_epoch_end(&ctx), CallbackAction::Continue);
        assert_eq!(cb.on_step_begin(&ctx), CallbackAction::Continue);
        assert_eq!(cb.on_step_end(&ctx), CallbackAction::Continue);
        assert!(cb.on_weights(&ctx, &net).is_ok());
        assert_eq!(cb.name(), "TrainerCallback");
        cb.on_train_end(&ctx);
    }
}
