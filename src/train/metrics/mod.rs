//! Evaluation metrics reported alongside the training loss

mod label_accuracy;
mod trait_def;

pub use label_accuracy::LabelAccuracy;
pub use trait_def::Metric;
