//! YAML schema of a stage training run

use crate::label::LabelMap;
use crate::network::Stage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete run specification
///
/// ```yaml
/// stage: refine
/// data:
///   path: data/r_net.safetensors
///   batch_size: 384
/// training:
///   epochs: 22
/// optimizer:
///   lr: 0.001
/// output:
///   log_root: runs
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSpec {
    pub stage: Stage,

    pub data: DataSpec,

    #[serde(default)]
    pub training: TrainingSpec,

    #[serde(default)]
    pub optimizer: OptimSpec,

    #[serde(default)]
    pub output: OutputSpec,

    /// Class-field encoding of the four sample kinds
    #[serde(default)]
    pub labels: LabelMap,
}

/// Training data location and batching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSpec {
    /// SafeTensors file holding `images`, `labels`, `bboxes`, `landmarks`
    pub path: PathBuf,

    pub batch_size: usize,

    /// Stream endless shuffled batches instead of fixed epochs over the
    /// array (output stage only)
    #[serde(default)]
    pub generator: bool,

    /// Batches per epoch when streaming; defaults to one pass over the data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_per_epoch: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSpec {
    #[serde(default = "default_epochs")]
    pub epochs: usize,

    #[serde(default)]
    pub initial_epoch: usize,

    /// Weights to resume from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default = "default_true")]
    pub shuffle: bool,

    #[serde(default = "default_log_interval")]
    pub log_interval: usize,
}

impl Default for TrainingSpec {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            initial_epoch: 0,
            weights: None,
            seed: None,
            shuffle: true,
            log_interval: default_log_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimSpec {
    #[serde(default = "default_lr")]
    pub lr: f32,

    /// Overrides the stage default (0 for arrays, 1e-4 for streaming)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<f32>,
}

impl Default for OptimSpec {
    fn default() -> Self {
        Self {
            lr: default_lr(),
            decay: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Parent of the per-run directories
    #[serde(default = "default_log_root")]
    pub log_root: PathBuf,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            log_root: default_log_root(),
        }
    }
}

fn default_epochs() -> usize {
    crate::driver::DEFAULT_EPOCHS
}

fn default_lr() -> f32 {
    crate::driver::DEFAULT_LR
}

fn default_true() -> bool {
    true
}

fn default_log_interval() -> usize {
    10
}

fn default_log_root() -> PathBuf {
    PathBuf::from("runs")
}
