//! Training configuration and per-run metric history

use serde::{Deserialize, Serialize};

/// Knobs of the fit loop that are not part of the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Emit a step-level progress line every N batches
    pub log_interval: usize,
    /// Reshuffle sample order at the start of each epoch
    pub shuffle: bool,
    /// Seed for shuffling; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            log_interval: 10,
            shuffle: true,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval.max(1);
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Running history of a fit call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsTracker {
    /// Epochs completed
    pub epoch: usize,
    /// Optimizer steps taken
    pub steps: usize,
    /// Mean loss per completed epoch
    pub losses: Vec<f32>,
    /// Mean label accuracy per completed epoch
    pub accuracies: Vec<f32>,
    /// Learning rate at the end of each epoch
    pub lrs: Vec<f32>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_epoch(&mut self, loss: f32, accuracy: f32, lr: f32) {
        self.losses.push(loss);
        self.accuracies.push(accuracy);
        self.lrs.push(lr);
        self.epoch += 1;
    }

    pub fn increment_step(&mut self) {
        self.steps += 1;
    }

    pub fn last_loss(&self) -> Option<f32> {
        self.losses.last().copied()
    }

    pub fn last_accuracy(&self) -> Option<f32> {
        self.accuracies.last().copied()
    }

    pub fn best_loss(&self) -> Option<f32> {
        self.losses
            .iter()
            .copied()
            .filter(|l| l.is_finite())
            .min_by(f32::total_cmp)
    }
}
