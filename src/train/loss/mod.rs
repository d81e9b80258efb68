//! Loss functions for multi-task cascade training
//!
//! - [`ClassificationOhem`] - hard-mined negative log-likelihood of the true class
//! - [`BoxOhem`] - squared error over bounding-box targets
//! - [`LandmarkOhem`] - squared error over landmark targets
//! - [`MultiTaskLoss`] - weighted sum of the three, the training objective

mod multitask;
mod task;
mod traits;

pub use multitask::{LossBreakdown, MultiTaskLoss, BBOX_WEIGHT, CLS_WEIGHT, LANDMARK_WEIGHT};
pub use task::{BoxOhem, ClassificationOhem, LandmarkOhem, TaskLoss, TaskLossFn, LOG_EPSILON};
pub use traits::LossFn;
