//! Run specification validation

use super::schema::TrainSpec;
use crate::label::{ClassPair, LabelMap, SampleKind, Task};
use crate::network::Stage;

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Initial epoch {initial} must be below epochs {epochs}")]
    InitialEpochPastEnd { initial: usize, epochs: usize },

    #[error("Invalid learning rate: {0} (must be > 0.0 and <= 1.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid decay: {0} (must be >= 0.0)")]
    InvalidDecay(f32),

    #[error("Invalid steps per epoch: {0} (must be > 0)")]
    InvalidStepsPerEpoch(usize),

    #[error("Invalid log interval: {0} (must be > 0)")]
    InvalidLogInterval(usize),

    #[error("Batch streaming is only supported for the output stage, got {0}")]
    GeneratorStage(Stage),

    #[error("Label map encodes {0} and {1} identically")]
    DuplicateLabel(SampleKind, SampleKind),

    #[error("Label map: {kind} must be valid for the {task} task")]
    LabelNotValidFor { kind: SampleKind, task: Task },
}

/// Validate a run specification
///
/// Checks numeric ranges, stage/streaming compatibility and that the label
/// map keeps the sample kinds apart.
pub fn validate_spec(spec: &TrainSpec) -> Result<(), ValidationError> {
    if spec.data.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(spec.data.batch_size));
    }

    if spec.training.epochs == 0 {
        return Err(ValidationError::InvalidEpochs(spec.training.epochs));
    }

    if spec.training.initial_epoch >= spec.training.epochs {
        return Err(ValidationError::InitialEpochPastEnd {
            initial: spec.training.initial_epoch,
            epochs: spec.training.epochs,
        });
    }

    if !(spec.optimizer.lr > 0.0 && spec.optimizer.lr <= 1.0) {
        return Err(ValidationError::InvalidLearningRate(spec.optimizer.lr));
    }

    if let Some(decay) = spec.optimizer.decay {
        if !(decay >= 0.0) {
            return Err(ValidationError::InvalidDecay(decay));
        }
    }

    if let Some(steps) = spec.data.steps_per_epoch {
        if steps == 0 {
            return Err(ValidationError::InvalidStepsPerEpoch(steps));
        }
    }

    if spec.training.log_interval == 0 {
        return Err(ValidationError::InvalidLogInterval(spec.training.log_interval));
    }

    if spec.data.generator && spec.stage != Stage::Output {
        return Err(ValidationError::GeneratorStage(spec.stage));
    }

    validate_labels(&spec.labels)
}

/// The four kinds must decode to distinct class pairs, and the face / non-face
/// kinds must reach the heads they train
pub fn validate_labels(labels: &LabelMap) -> Result<(), ValidationError> {
    let pair = |kind| {
        let [a, b] = labels.encode(kind);
        ClassPair::from_values(a, b)
    };

    for (i, &a) in SampleKind::ALL.iter().enumerate() {
        for &b in &SampleKind::ALL[i + 1..] {
            if pair(a) == pair(b) {
                return Err(ValidationError::DuplicateLabel(a, b));
            }
        }
    }

    let required = [
        (SampleKind::Positive, Task::Classification),
        (SampleKind::Positive, Task::BoundingBox),
        (SampleKind::Negative, Task::Classification),
    ];
    for (kind, task) in required {
        if !task.is_valid(pair(kind)) {
            return Err(ValidationError::LabelNotValidFor { kind, task });
        }
    }
    Ok(())
}
