//! Per-epoch scalar log in JSON lines

use super::traits::{CallbackContext, TrainerCallback};
use crate::network::Network;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One line of `scalars.jsonl`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: usize,
    pub loss: f32,
    pub accuracy: f32,
    pub lr: f32,
    pub elapsed_secs: f64,
}

/// Appends an [`EpochRecord`] to `<dir>/scalars.jsonl` after every epoch.
///
/// A failed write aborts training.
#[derive(Debug)]
pub struct ScalarLogger {
    dir: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl ScalarLogger {
    pub const FILE_NAME: &'static str = "scalars.jsonl";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writer: None,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(Self::FILE_NAME)
    }

    fn open(&mut self) -> std::io::Result<&mut BufWriter<File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                std::fs::create_dir_all(&self.dir)?;
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(self.path())?;
                BufWriter::new(file)
            }
        };
        Ok(self.writer.insert(writer))
    }

    fn append(&mut self, record: &EpochRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        let writer = self.open()?;
        writeln!(writer, "{line}")?;
        writer.flush()
    }

    /// Parse a log written by this callback
    pub fn read(path: &Path) -> Result<Vec<EpochRecord>> {
        let content = std::fs::read_to_string(path)?;
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .map_err(|e| crate::Error::Serialization(format!("bad scalar line: {e}")))
            })
            .collect()
    }
}

impl TrainerCallback for ScalarLogger {
    fn on_weights(&mut self, ctx: &CallbackContext, _network: &dyn Network) -> Result<()> {
        let record = EpochRecord {
            epoch: ctx.epoch,
            loss: ctx.loss,
            accuracy: ctx.accuracy,
            lr: ctx.lr,
            elapsed_secs: ctx.elapsed_secs,
        };
        if let Err(e) = self.append(&record) {
            tracing::error!(path = %self.path().display(), error = %e, "failed to write scalars");
            self.writer = None;
            return Err(e.into());
        }
        Ok(())
    }

    fn on_train_end(&mut self, _ctx: &CallbackContext) {
        self.writer = None;
    }

    fn name(&self) -> &'static str {
        "ScalarLogger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::TargetLayout;
    use crate::network::{LinearNetwork, Stage};
    use crate::Error;

    fn network() -> LinearNetwork {
        LinearNetwork::new(Stage::Proposal, 1, TargetLayout::new(0), 0)
    }

    #[test]
    fn test_one_line_per_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let mut logger = ScalarLogger::new(&logs);
        let net = network();

        for epoch in 0..3 {
            let ctx = CallbackContext {
                epoch,
                loss: 1.0 / (epoch + 1) as f32,
                accuracy: 0.5,
                lr: 0.001,
                ..Default::default()
            };
            logger.on_weights(&ctx, &net).unwrap();
        }
        logger.on_train_end(&CallbackContext::default());

        let records = ScalarLogger::read(&logs.join(ScalarLogger::FILE_NAME)).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].epoch, 2);
        assert_eq!(records[1].loss, 0.5);
    }

    #[test]
    fn test_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        for _ in 0..2 {
            let mut logger = ScalarLogger::new(dir.path());
            logger
                .on_weights(&CallbackContext::default(), &network())
                .unwrap();
            logger.on_train_end(&CallbackContext::default());
        }
        let records = ScalarLogger::read(&dir.path().join(ScalarLogger::FILE_NAME)).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_write_failure_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut logger = ScalarLogger::new(&blocker);
        let err = logger
            .on_weights(&CallbackContext::default(), &network())
            .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
    }
}
