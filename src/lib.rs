//! # mtcnn-train
//!
//! Stage-by-stage training for the MTCNN face detection cascade: a
//! proposal, a refinement and an output network, each trained on a
//! composite target of `[label(2), bbox(4), landmark(2P)]` with online hard
//! example mining.
//!
//! - [`label`]: sample kinds, label encoding and per-task validity masks
//! - [`ohem`]: hardest-example selection
//! - [`train`]: multi-task loss, metric, datasets, trainer and callbacks
//! - [`driver`]: the four stage training entry points
//! - [`network`]: the network seam and a baseline dense network
//! - [`config`] / [`cli`]: YAML run specs and the `mtcnn-train` binary
//!
//! # Example
//!
//! ```
//! use mtcnn_train::train::MultiTaskLoss;
//!
//! assert!((MultiTaskLoss::combine(2.0, 1.0, 0.4) - 2.7).abs() < 1e-6);
//! ```

pub mod autograd;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod io;
pub mod label;
pub mod network;
pub mod ohem;
pub mod optim;
pub mod train;

pub use autograd::Tensor;
pub use error::{Error, Result};
