//! Multi-task training loop
//!
//! - OHEM multi-task loss over the label, box and landmark heads
//! - Label accuracy metric
//! - In-memory datasets and endless batch streams
//! - Trainer with callbacks, resuming and weight checkpoints
//!
//! # Example
//!
//! ```no_run
//! use mtcnn_train::label::TargetLayout;
//! use mtcnn_train::network::{LinearProvider, NetworkProvider, Stage};
//! use mtcnn_train::optim::Adam;
//! use mtcnn_train::train::{Dataset, LabelAccuracy, MultiTaskLoss, TrainConfig, Trainer};
//!
//! # let dataset: Dataset = todo!();
//! let layout = dataset.layout();
//! let network = LinearProvider::new(layout).build(Stage::Refine, true)?;
//! let mut trainer = Trainer::new(network, Box::new(Adam::default_params(0.001)), TrainConfig::default());
//! trainer.compile(Box::new(MultiTaskLoss::new(layout)), Box::new(LabelAccuracy::new(layout)));
//!
//! let result = trainer.fit(&dataset, 384, 0, 22)?;
//! println!("loss {:.4}", result.final_loss);
//! # Ok::<(), mtcnn_train::Error>(())
//! ```

mod batch;
pub mod callback;
mod config;
mod data;
mod loss;
mod metrics;
mod trainer;

pub use batch::Batch;
pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, EpochRecord, ModelCheckpoint,
    ProgressCallback, ScalarLogger, TerminateOnNan, TrainerCallback,
};
pub use config::{MetricsTracker, TrainConfig};
pub use data::{BatchGenerator, Dataset};
pub use loss::{
    BoxOhem, ClassificationOhem, LandmarkOhem, LossBreakdown, LossFn, MultiTaskLoss, TaskLoss,
    TaskLossFn, BBOX_WEIGHT, CLS_WEIGHT, LANDMARK_WEIGHT, LOG_EPSILON,
};
pub use metrics::{LabelAccuracy, Metric};
pub use trainer::{StepOutput, TrainResult, Trainer};
