//! Optimizer trait

use crate::Tensor;

/// Updates parameters in place from their accumulated gradients
pub trait Optimizer {
    fn step(&mut self, params: &mut [Tensor]);

    fn zero_grad(&mut self, params: &mut [Tensor]) {
        for param in params {
            param.zero_grad();
        }
    }

    /// Base learning rate
    fn lr(&self) -> f32;

    fn set_lr(&mut self, lr: f32);

    /// Learning rate applied by the next step, after any decay
    fn effective_lr(&self) -> f32 {
        self.lr()
    }
}
