//! Trainer that fits a [`Network`](crate::network::Network) with a
//! multi-task loss
//!
//! - Single training steps
//! - Multi-epoch fitting from in-memory data or a batch stream
//! - Resuming from an initial epoch
//!
//! # Example
//!
//! ```no_run
//! use mtcnn_train::label::TargetLayout;
//! use mtcnn_train::network::{LinearProvider, NetworkProvider, Stage};
//! use mtcnn_train::optim::Adam;
//! use mtcnn_train::train::{LabelAccuracy, MultiTaskLoss, ProgressCallback, TrainConfig, Trainer};
//!
//! let layout = TargetLayout::default();
//! let network = LinearProvider::new(layout).build(Stage::Proposal, true)?;
//! let mut trainer = Trainer::new(network, Box::new(Adam::default_params(0.001)), TrainConfig::default());
//! trainer.compile(Box::new(MultiTaskLoss::new(layout)), Box::new(LabelAccuracy::new(layout)));
//! trainer.add_callback(ProgressCallback::new(10));
//!
//! // let result = trainer.fit(&dataset, 384, 0, 30)?;
//! # Ok::<(), mtcnn_train::Error>(())
//! ```

mod core;
mod fit;
mod result;
mod step;

pub use core::Trainer;
pub use result::TrainResult;
pub use step::StepOutput;
