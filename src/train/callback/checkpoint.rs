//! Weights checkpointing after every epoch

use super::traits::{CallbackContext, TrainerCallback};
use crate::network::Network;
use crate::Result;
use std::path::{Path, PathBuf};

/// Writes the network's weights to one file after every epoch,
/// overwriting the previous epoch's checkpoint.
#[derive(Clone, Debug)]
pub struct ModelCheckpoint {
    path: PathBuf,
    last_saved_epoch: Option<usize>,
}

impl ModelCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_saved_epoch: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_saved_epoch(&self) -> Option<usize> {
        self.last_saved_epoch
    }
}

impl TrainerCallback for ModelCheckpoint {
    fn on_weights(&mut self, ctx: &CallbackContext, network: &dyn Network) -> Result<()> {
        network.save_weights(&self.path)?;
        tracing::debug!(epoch = ctx.epoch, path = %self.path.display(), "saved weights");
        self.last_saved_epoch = Some(ctx.epoch);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ModelCheckpoint"
    }
}
