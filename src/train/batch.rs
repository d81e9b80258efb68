//! Batch data structure

use crate::Tensor;

/// A mini-batch of flattened input rows and target rows
#[derive(Clone)]
pub struct Batch {
    /// Input features, `[rows * input_dim]`
    pub inputs: Tensor,
    /// Composite targets, `[rows * target_width]`
    pub targets: Tensor,
    /// Number of samples
    pub rows: usize,
}

impl Batch {
    pub fn new(inputs: Tensor, targets: Tensor, rows: usize) -> Self {
        assert!(
            rows == 0 || (inputs.len() % rows == 0 && targets.len() % rows == 0),
            "Batch buffers must hold whole rows"
        );
        Self {
            inputs,
            targets,
            rows,
        }
    }

    /// Number of samples in the batch
    pub fn size(&self) -> usize {
        self.rows
    }

    pub fn input_dim(&self) -> usize {
        if self.rows == 0 {
            0
        } else {
            self.inputs.len() / self.rows
        }
    }
}
