//! Face / non-face accuracy of the label head

use super::Metric;
use crate::label::{class_pairs, validity_mask, TargetLayout, Task};
use crate::Tensor;
use ndarray::s;

/// Fraction of classification-valid samples whose argmax over the label
/// head equals the true class.
///
/// Partial and landmark-only samples carry no class target and are
/// skipped. A batch without any classification-valid sample scores 0.
///
/// # Example
///
/// ```
/// use mtcnn_train::train::{LabelAccuracy, Metric};
/// use mtcnn_train::label::TargetLayout;
/// use mtcnn_train::Tensor;
///
/// let metric = LabelAccuracy::new(TargetLayout::new(0));
/// // positive then negative sample, rows of [label(2), bbox(4)]
/// let target = Tensor::from_vec(
///     vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
///     false,
/// );
/// let pred = Tensor::from_vec(
///     vec![0.2, 0.8, 0.0, 0.0, 0.0, 0.0, 0.9, 0.1, 0.0, 0.0, 0.0, 0.0],
///     false,
/// );
/// assert_eq!(metric.compute(&pred, &target), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LabelAccuracy {
    layout: TargetLayout,
}

impl LabelAccuracy {
    pub fn new(layout: TargetLayout) -> Self {
        Self { layout }
    }
}

impl Metric for LabelAccuracy {
    fn compute(&self, predictions: &Tensor, targets: &Tensor) -> f32 {
        assert_eq!(
            predictions.len(),
            targets.len(),
            "Predictions and targets must have same length"
        );
        let (Some(pred), Some(truth)) = (predictions.data().as_slice(), targets.data().as_slice())
        else {
            return 0.0;
        };
        let pred = self.layout.rows(pred);
        let truth = self.layout.rows(truth);
        let cols = self.layout.label_columns();
        let pairs = class_pairs(truth.slice(s![.., cols.clone()]));
        let mask = validity_mask(Task::Classification, &pairs);

        let total = mask.count_valid();
        if total == 0 {
            return 0.0;
        }

        let correct = mask
            .valid_indices()
            .filter(|&i| {
                let row = pred.slice(s![i, cols.clone()]);
                let predicted = usize::from(row[1] > row[0]);
                predicted == pairs[i].true_class()
            })
            .count();

        correct as f32 / total as f32
    }

    fn name(&self) -> &str {
        "accuracy"
    }
}
