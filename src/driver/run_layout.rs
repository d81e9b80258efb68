//! Per-run output directories and the default observer set

use crate::network::Stage;
use crate::train::{
    ModelCheckpoint, ProgressCallback, ScalarLogger, TerminateOnNan, TrainerCallback,
};
use crate::Result;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// `YYYYMMDD_HHMMSS.ffffff`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%.6f";

/// Extension of the checkpoint written after every epoch
pub const CHECKPOINT_EXTENSION: &str = "safetensors";

/// Where one training run writes its checkpoint and logs.
///
/// ```text
/// <log_root>/<prefix>_<timestamp>/
///     <prefix>_<epochs>_<timestamp>.safetensors
///     logs/scalars.jsonl
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    pub stage: Stage,
    pub timestamp: String,
    pub run_dir: PathBuf,
    pub model_file: PathBuf,
    pub log_dir: PathBuf,
}

impl RunLayout {
    /// Resolve the paths for a run starting now and create its directories
    pub fn create(log_root: impl AsRef<Path>, stage: Stage, epochs: usize) -> Result<Self> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let layout = Self::at(log_root, stage, epochs, timestamp);
        fs::create_dir_all(&layout.log_dir)?;
        tracing::info!(run_dir = %layout.run_dir.display(), "created run directory");
        Ok(layout)
    }

    /// Resolve the paths for a given timestamp without touching the disk
    pub fn at(log_root: impl AsRef<Path>, stage: Stage, epochs: usize, timestamp: String) -> Self {
        let prefix = stage.prefix();
        let run_dir = log_root.as_ref().join(format!("{prefix}_{timestamp}"));
        let model_file =
            run_dir.join(format!("{prefix}_{epochs}_{timestamp}.{CHECKPOINT_EXTENSION}"));
        let log_dir = run_dir.join("logs");
        Self {
            stage,
            timestamp,
            run_dir,
            model_file,
            log_dir,
        }
    }

    /// Checkpoint, scalar log, progress and NaN guard wired to this run
    pub fn default_callbacks(&self, log_interval: usize) -> Vec<Box<dyn TrainerCallback>> {
        vec![
            Box::new(ModelCheckpoint::new(&self.model_file)),
            Box::new(ScalarLogger::new(&self.log_dir)),
            Box::new(ProgressCallback::new(log_interval)),
            Box::new(TerminateOnNan),
        ]
    }
}
