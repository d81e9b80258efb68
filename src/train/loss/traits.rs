//! Loss function trait

use crate::Tensor;

/// A differentiable loss over a flat batch of prediction rows.
///
/// `predictions` and `targets` are row-major `[n * width]` buffers sharing
/// one row layout. The returned tensor holds a single value and, when the
/// predictions require gradients, a backward op that seeds them.
pub trait LossFn {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor;

    /// Name used in logs and saved metadata
    fn name(&self) -> &str;
}
