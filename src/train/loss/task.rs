//! Per-task OHEM losses: classification, box regression, landmark regression
//!
//! Each loss masks the batch with its task's validity rule, ranks the
//! per-sample errors, keeps the hardest ones and averages them. Alongside
//! the value it returns the gradient with respect to its own prediction
//! columns so the composite loss can seed the backward pass.

use crate::label::{validity_mask, ClassPair, Task};
use crate::ohem::{select_hardest, KeepPolicy, Selection, NUM_KEEP_RATIO};
use ndarray::{Array2, ArrayView2};

/// Added to the gathered probability before the logarithm
pub const LOG_EPSILON: f32 = 1e-10;

/// Value and gradient of one task's loss over one batch.
#[derive(Debug, Clone)]
pub struct TaskLoss {
    pub task: Task,
    /// Mean error of the kept samples (0.0 when nothing is kept)
    pub value: f32,
    /// Which samples survived hard example mining
    pub selection: Selection,
    /// ∂value/∂prediction over the task's columns, shape `[n, task_width]`
    pub grad: Array2<f32>,
}

/// A loss over one head of the multi-task network.
pub trait TaskLossFn {
    fn task(&self) -> Task;

    /// Evaluate over a batch.
    ///
    /// `truth` and `pred` hold only this task's columns, one row per sample.
    fn evaluate(
        &self,
        pairs: &[ClassPair],
        truth: ArrayView2<'_, f32>,
        pred: ArrayView2<'_, f32>,
    ) -> TaskLoss;
}

/// Hard-mined negative log-likelihood of the true class.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationOhem {
    keep_ratio: f32,
}

impl Default for ClassificationOhem {
    fn default() -> Self {
        Self {
            keep_ratio: NUM_KEEP_RATIO,
        }
    }
}

impl ClassificationOhem {
    pub fn new(keep_ratio: f32) -> Self {
        assert!(
            keep_ratio > 0.0 && keep_ratio <= 1.0,
            "keep ratio must be in (0, 1], got {keep_ratio}"
        );
        Self { keep_ratio }
    }

    pub fn keep_ratio(&self) -> f32 {
        self.keep_ratio
    }
}

impl TaskLossFn for ClassificationOhem {
    fn task(&self) -> Task {
        Task::Classification
    }

    fn evaluate(
        &self,
        pairs: &[ClassPair],
        _truth: ArrayView2<'_, f32>,
        pred: ArrayView2<'_, f32>,
    ) -> TaskLoss {
        assert_eq!(pred.nrows(), pairs.len(), "Predictions and labels must have same length");

        let probs: Vec<f32> = pairs
            .iter()
            .zip(pred.rows())
            .map(|(pair, row)| row[pair.true_class()])
            .collect();
        // -ln(p + eps) dips below zero only for p > 1 - eps. Non-finite
        // losses are made positive so they rank hardest and reach the total.
        let losses: Vec<f32> = probs
            .iter()
            .map(|&p| {
                let loss = -(p + LOG_EPSILON).ln();
                if loss.is_finite() {
                    loss.max(0.0)
                } else {
                    loss.abs()
                }
            })
            .collect();

        let mask = validity_mask(Task::Classification, pairs);
        let selection = select_hardest(&losses, &mask, KeepPolicy::Ratio(self.keep_ratio));

        let mut grad = Array2::zeros(pred.raw_dim());
        let k = selection.len() as f32;
        for &i in &selection.indices {
            if losses[i] != 0.0 {
                grad[[i, pairs[i].true_class()]] = -1.0 / (k * (probs[i] + LOG_EPSILON));
            }
        }

        TaskLoss {
            task: Task::Classification,
            value: selection.mean(),
            selection,
            grad,
        }
    }
}

/// Mean summed squared error over bbox-valid samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxOhem;

impl TaskLossFn for BoxOhem {
    fn task(&self) -> Task {
        Task::BoundingBox
    }

    fn evaluate(
        &self,
        pairs: &[ClassPair],
        truth: ArrayView2<'_, f32>,
        pred: ArrayView2<'_, f32>,
    ) -> TaskLoss {
        squared_error_ohem(Task::BoundingBox, pairs, truth, pred)
    }
}

/// Mean summed squared error over landmark-valid samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandmarkOhem;

impl TaskLossFn for LandmarkOhem {
    fn task(&self) -> Task {
        Task::Landmark
    }

    fn evaluate(
        &self,
        pairs: &[ClassPair],
        truth: ArrayView2<'_, f32>,
        pred: ArrayView2<'_, f32>,
    ) -> TaskLoss {
        squared_error_ohem(Task::Landmark, pairs, truth, pred)
    }
}

/// Regression heads keep every valid sample; ranking only orders them.
fn squared_error_ohem(
    task: Task,
    pairs: &[ClassPair],
    truth: ArrayView2<'_, f32>,
    pred: ArrayView2<'_, f32>,
) -> TaskLoss {
    assert_eq!(truth.dim(), pred.dim(), "Predictions and targets must have same shape");
    assert_eq!(pred.nrows(), pairs.len(), "Predictions and labels must have same length");

    let diff = &pred - &truth;
    let errors: Vec<f32> = diff
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|d| d * d).sum())
        .collect();

    let mask = validity_mask(task, pairs);
    let selection = select_hardest(&errors, &mask, KeepPolicy::AllValid);

    let mut grad = Array2::zeros(pred.raw_dim());
    let k = selection.len() as f32;
    for &i in &selection.indices {
        grad.row_mut(i).assign(&diff.row(i).mapv(|d| 2.0 * d / k));
    }

    TaskLoss {
        task,
        value: selection.mean(),
        selection,
        grad,
    }
}
