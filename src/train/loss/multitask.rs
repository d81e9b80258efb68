//! Weighted sum of the three task losses

use super::task::{BoxOhem, ClassificationOhem, LandmarkOhem, TaskLoss, TaskLossFn};
use super::LossFn;
use crate::autograd::BackwardOp;
use crate::label::{class_pairs, TargetLayout, Task};
use crate::Tensor;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Weight of the classification loss
pub const CLS_WEIGHT: f32 = 1.0;
/// Weight of the bounding-box loss
pub const BBOX_WEIGHT: f32 = 0.5;
/// Weight of the landmark loss
pub const LANDMARK_WEIGHT: f32 = 0.5;

/// The per-task values making up one composite loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossBreakdown {
    pub classification: f32,
    pub bbox: f32,
    pub landmark: f32,
    pub total: f32,
}

impl LossBreakdown {
    pub fn get(&self, task: Task) -> f32 {
        match task {
            Task::Classification => self.classification,
            Task::BoundingBox => self.bbox,
            Task::Landmark => self.landmark,
        }
    }
}

/// Composite OHEM loss `cls + 0.5 * bbox + 0.5 * landmark`.
///
/// Every head is always evaluated on every batch; a head with no valid
/// samples contributes zero.
///
/// # Example
///
/// ```
/// use mtcnn_train::train::{LossFn, MultiTaskLoss};
/// use mtcnn_train::label::TargetLayout;
/// use mtcnn_train::Tensor;
///
/// let layout = TargetLayout::new(1);
/// let loss_fn = MultiTaskLoss::new(layout);
///
/// // one positive sample: [label(2), bbox(4), landmark(2)]
/// let target = Tensor::from_vec(vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], false);
/// let pred = Tensor::from_vec(vec![0.5, 0.5, 0.1, 0.1, 0.1, 0.1, 0.0, 0.0], true);
///
/// let loss = loss_fn.forward(&pred, &target);
/// assert!(loss.data()[0] > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct MultiTaskLoss {
    layout: TargetLayout,
    classification: ClassificationOhem,
    bbox: BoxOhem,
    landmark: LandmarkOhem,
}

impl MultiTaskLoss {
    pub fn new(layout: TargetLayout) -> Self {
        Self {
            layout,
            classification: ClassificationOhem::default(),
            bbox: BoxOhem,
            landmark: LandmarkOhem,
        }
    }

    /// Override the classification keep ratio
    pub fn with_keep_ratio(mut self, keep_ratio: f32) -> Self {
        self.classification = ClassificationOhem::new(keep_ratio);
        self
    }

    pub fn layout(&self) -> TargetLayout {
        self.layout
    }

    /// `cls + 0.5 * bbox + 0.5 * landmark`
    pub fn combine(cls: f32, bbox: f32, landmark: f32) -> f32 {
        CLS_WEIGHT * cls + BBOX_WEIGHT * bbox + LANDMARK_WEIGHT * landmark
    }

    pub fn weight(task: Task) -> f32 {
        match task {
            Task::Classification => CLS_WEIGHT,
            Task::BoundingBox => BBOX_WEIGHT,
            Task::Landmark => LANDMARK_WEIGHT,
        }
    }

    /// Evaluate every task loss without touching gradients
    pub fn breakdown(&self, predictions: &Tensor, targets: &Tensor) -> LossBreakdown {
        let losses = self.evaluate(predictions, targets);
        summarize(&losses)
    }

    fn evaluate(&self, predictions: &Tensor, targets: &Tensor) -> Vec<TaskLoss> {
        assert_eq!(
            predictions.len(),
            targets.len(),
            "Predictions and targets must have same length"
        );
        let pred_slice = predictions
            .data()
            .as_slice()
            .expect("tensor data is contiguous");
        let target_slice = targets.data().as_slice().expect("tensor data is contiguous");
        let pred = self.layout.rows(pred_slice);
        let truth = self.layout.rows(target_slice);
        let pairs = class_pairs(truth.slice(s![.., self.layout.label_columns()]));

        let heads: [&dyn TaskLossFn; 3] = [&self.classification, &self.bbox, &self.landmark];
        heads
            .iter()
            .map(|head| {
                let cols = self.layout.task_columns(head.task());
                head.evaluate(
                    &pairs,
                    truth.slice(s![.., cols.clone()]),
                    pred.slice(s![.., cols]),
                )
            })
            .collect()
    }
}

fn summarize(losses: &[TaskLoss]) -> LossBreakdown {
    let value = |task: Task| {
        losses
            .iter()
            .find(|l| l.task == task)
            .map_or(0.0, |l| l.value)
    };
    let classification = value(Task::Classification);
    let bbox = value(Task::BoundingBox);
    let landmark = value(Task::Landmark);
    LossBreakdown {
        classification,
        bbox,
        landmark,
        total: MultiTaskLoss::combine(classification, bbox, landmark),
    }
}

struct MultiTaskBackward {
    predictions: Tensor,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
    grad: Array1<f32>,
}

impl BackwardOp for MultiTaskBackward {
    fn backward(&self) {
        let upstream = self
            .result_grad
            .borrow()
            .as_ref()
            .map_or(1.0, |g| g[0]);
        if self.predictions.requires_grad() {
            self.predictions.accumulate_grad(&self.grad * upstream);
        }
        if let Some(op) = self.predictions.backward_op() {
            op.backward();
        }
    }
}

impl LossFn for MultiTaskLoss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        let losses = self.evaluate(predictions, targets);
        let breakdown = summarize(&losses);
        if !breakdown.total.is_finite() {
            tracing::warn!(?breakdown, "non-finite multi-task loss");
        }

        let mut loss = Tensor::from_vec(vec![breakdown.total], true);

        if predictions.requires_grad() {
            let width = self.layout.width();
            let rows = self.layout.num_rows(predictions.len());
            let mut grad = Array2::<f32>::zeros((rows, width));
            for task_loss in &losses {
                let cols = self.layout.task_columns(task_loss.task);
                let weight = Self::weight(task_loss.task);
                grad.slice_mut(s![.., cols])
                    .scaled_add(weight, &task_loss.grad);
            }
            let grad = Array1::from_iter(grad.into_iter());

            loss.set_backward_op(Rc::new(MultiTaskBackward {
                predictions: predictions.clone(),
                result_grad: loss.grad_cell(),
                grad,
            }));
        }

        loss
    }

    fn name(&self) -> &str {
        "MultiTaskOhem"
    }
}
