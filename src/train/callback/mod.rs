//! Callback system for training events
//!
//! Hooks fire around the fit loop: `on_train_begin` / `on_train_end`,
//! `on_epoch_begin` / `on_epoch_end`, `on_step_begin` / `on_step_end`, and
//! `on_weights` once per epoch with the network.
//!
//! # Example
//!
//! ```rust
//! use mtcnn_train::train::callback::{CallbackAction, CallbackContext, TrainerCallback};
//!
//! struct PrintCallback;
//!
//! impl TrainerCallback for PrintCallback {
//!     fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
//!         println!("Epoch {} finished with loss {:.4}", ctx.epoch, ctx.loss);
//!         CallbackAction::Continue
//!     }
//! }
//! ```

mod checkpoint;
mod manager;
mod nan_guard;
mod progress;
mod scalars;
mod traits;

pub use checkpoint::ModelCheckpoint;
pub use manager::CallbackManager;
pub use nan_guard::TerminateOnNan;
pub use progress::ProgressCallback;
pub use scalars::{EpochRecord, ScalarLogger};
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
