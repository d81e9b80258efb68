//! Declarative stage training from YAML
//!
//! A run spec names the stage, the dataset file, the epoch range, the
//! optimizer settings, the output root and the label encoding.

mod cli;
mod loader;
mod run;
mod schema;
mod validate;

pub use cli::{Cli, Command, InfoArgs, TrainArgs, ValidateArgs};
pub use loader::{load_spec, load_stage_data, BBOXES, IMAGES, LABELS, LANDMARKS};
pub use run::{train_from_spec, train_from_yaml, train_with_provider, TrainedRun};
pub use schema::{DataSpec, OptimSpec, OutputSpec, TrainSpec, TrainingSpec};
pub use validate::{validate_labels, validate_spec, ValidationError};

