//! Training result types

/// Result of a fit call
#[derive(Debug, Clone, PartialEq)]
pub struct TrainResult {
    /// Epoch index training stopped at (exclusive); pass it back as the
    /// initial epoch to resume
    pub final_epoch: usize,
    /// Epochs completed by this call
    pub epochs_run: usize,
    /// Mean loss of the last completed epoch
    pub final_loss: f32,
    /// Mean label accuracy of the last completed epoch
    pub final_accuracy: f32,
    /// Best epoch loss achieved
    pub best_loss: f32,
    /// Whether training was stopped early
    pub stopped_early: bool,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
