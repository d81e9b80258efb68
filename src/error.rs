//! Error types for mtcnn-train
//!
//! Configuration problems (unknown task tags, unknown stages, malformed
//! specs) and persistence failures surface here. Shape violations inside
//! the loss hot path are programmer errors and panic instead.

use thiserror::Error;

/// Result type alias for mtcnn-train operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing data, loading weights or training.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure (JSON, YAML, SafeTensors)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid or unreadable run configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Task tag that is not one of classification / bbox / landmark
    #[error("Unknown task '{0}' while calculating mask (expected 'label', 'bbox' or 'landmark')")]
    UnknownTask(String),

    /// Stage name that is not one of the three cascade stages
    #[error("Unknown stage '{0}' (expected 'proposal', 'refine' or 'output')")]
    UnknownStage(String),

    /// Raw sample tag missing from the label map
    #[error("Unknown sample tag '{0}' (expected one of '0', '1', '-1', '-2')")]
    UnknownSampleTag(String),

    /// Array dimensions disagree
    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Weight file does not fit the network it is loaded into
    #[error("Incompatible weights: {0}")]
    WeightsMismatch(String),
}

impl Error {
    /// Convenience constructor for shape mismatches.
    pub fn shape(context: impl Into<String>, expected: Vec<usize>, actual: Vec<usize>) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_task_message() {
        let err = Error::UnknownTask("score".to_string());
        assert!(err.to_string().contains("score"));
        assert!(err.to_string().contains("calculating mask"));
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = Error::shape("targets", vec![10, 16], vec![10, 15]);
        let msg = err.to_string();
        assert!(msg.contains("targets"));
        assert!(msg.contains("[10, 16]"));
        assert!(msg.contains("[10, 15]"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
