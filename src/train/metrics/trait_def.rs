//! Core Metric trait definition

use crate::Tensor;

/// An evaluation metric over a flat batch of prediction and target rows
pub trait Metric {
    fn compute(&self, predictions: &Tensor, targets: &Tensor) -> f32;

    fn name(&self) -> &str;

    /// Whether higher values are better (true) or lower (false)
    fn higher_is_better(&self) -> bool {
        true
    }
}
