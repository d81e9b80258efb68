//! Stage training driver
//!
//! Builds a stage network through a [`NetworkProvider`](crate::network::NetworkProvider),
//! optionally restores weights, compiles it with the multi-task OHEM loss
//! and fits it. [`RunLayout`] names the checkpoint and log locations of a run.
//!
//! # Example
//!
//! ```no_run
//! use mtcnn_train::driver::{train_refine_net, RunLayout, StageArrays, StageOptions};
//! use mtcnn_train::label::TargetLayout;
//! use mtcnn_train::network::{LinearProvider, Stage};
//! # let data: StageArrays<'_> = todo!();
//!
//! let run = RunLayout::create("runs", Stage::Refine, 22)?;
//! let options = StageOptions::new()
//!     .with_epochs(22)
//!     .with_callbacks(run.default_callbacks(10));
//! let provider = LinearProvider::new(TargetLayout::default());
//!
//! let outcome = train_refine_net(&provider, data, 384, options)?;
//! println!("final loss {:.4}", outcome.result.final_loss);
//! # Ok::<(), mtcnn_train::Error>(())
//! ```

mod run_layout;
mod stages;

pub use run_layout::{RunLayout, CHECKPOINT_EXTENSION, TIMESTAMP_FORMAT};
pub use stages::{
    train_output_net, train_output_net_with_generator, train_proposal_net, train_refine_net,
    StageArrays, StageData, StageOptions, StageOutcome, DEFAULT_EPOCHS, DEFAULT_LR, GENERATOR_DECAY,
};
