//! Core Trainer struct and basic methods

use crate::network::Network;
use crate::optim::Optimizer;
use crate::train::callback::{CallbackContext, CallbackManager, TrainerCallback};
use crate::train::{LossFn, Metric, MetricsTracker, TrainConfig};
use std::time::Instant;

/// Drives a [`Network`] through the fit loop
///
/// # Example
///
/// ```no_run
/// use mtcnn_train::label::TargetLayout;
/// use mtcnn_train::network::{NetworkProvider, LinearProvider, Stage};
/// use mtcnn_train::optim::Adam;
/// use mtcnn_train::train::{LabelAccuracy, MultiTaskLoss, TrainConfig, Trainer};
///
/// let layout = TargetLayout::default();
/// let network = LinearProvider::new(layout).build(Stage::Proposal, true).unwrap();
///
/// let mut trainer = Trainer::new(network, Box::new(Adam::default_params(0.001)), TrainConfig::default());
/// trainer.compile(Box::new(MultiTaskLoss::new(layout)), Box::new(LabelAccuracy::new(layout)));
/// ```
pub struct Trainer {
    pub(crate) network: Box<dyn Network>,

    pub(crate) optimizer: Box<dyn Optimizer>,

    pub(crate) loss_fn: Option<Box<dyn LossFn>>,

    /// Reported alongside the loss
    pub(crate) metric: Option<Box<dyn Metric>>,

    pub(crate) config: TrainConfig,

    pub metrics: MetricsTracker,

    pub(crate) callbacks: CallbackManager,

    pub(crate) best_loss: Option<f32>,

    pub(crate) start_time: Option<Instant>,
}

impl Trainer {
    pub fn new(
        network: Box<dyn Network>,
        optimizer: Box<dyn Optimizer>,
        config: TrainConfig,
    ) -> Self {
        Self {
            network,
            optimizer,
            loss_fn: None,
            metric: None,
            config,
            metrics: MetricsTracker::new(),
            callbacks: CallbackManager::new(),
            best_loss: None,
            start_time: None,
        }
    }

    /// Attach the loss and the reported metric
    pub fn compile(&mut self, loss_fn: Box<dyn LossFn>, metric: Box<dyn Metric>) {
        tracing::debug!(loss = loss_fn.name(), metric = metric.name(), "compiled");
        self.loss_fn = Some(loss_fn);
        self.metric = Some(metric);
    }

    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    pub fn add_boxed_callback(&mut self, callback: Box<dyn TrainerCallback>) {
        self.callbacks.add_boxed(callback);
    }

    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }

    /// Effective learning rate of the next step
    pub fn lr(&self) -> f32 {
        self.optimizer.effective_lr()
    }

    pub fn network(&self) -> &dyn Network {
        self.network.as_ref()
    }

    pub fn into_network(self) -> Box<dyn Network> {
        self.network
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub(crate) fn build_context(
        &self,
        epoch: usize,
        max_epochs: usize,
        step: usize,
        steps_per_epoch: usize,
        loss: f32,
        accuracy: f32,
    ) -> CallbackContext {
        CallbackContext {
            epoch,
            max_epochs,
            step,
            steps_per_epoch,
            global_step: self.metrics.steps,
            loss,
            accuracy,
            lr: self.lr(),
            best_loss: self.best_loss,
            elapsed_secs: self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64()),
        }
    }
}
