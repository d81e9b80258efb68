//! Tensor type with gradient tracking

use super::BackwardOp;
use ndarray::Array1;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A flat `f32` tensor that records how it was produced.
///
/// Data is owned by each handle. The gradient cell is shared between clones,
/// so a clone captured by a backward op accumulates into the same buffer the
/// optimizer later reads from the original handle.
#[derive(Clone)]
pub struct Tensor {
    data: Array1<f32>,
    grad: Rc<RefCell<Option<Array1<f32>>>>,
    backward_op: Option<Rc<dyn BackwardOp>>,
    requires_grad: bool,
}

impl Tensor {
    /// Create a tensor from an ndarray
    pub fn new(data: Array1<f32>, requires_grad: bool) -> Self {
        Self {
            data,
            grad: Rc::new(RefCell::new(None)),
            backward_op: None,
            requires_grad,
        }
    }

    /// Create a tensor from a vector
    pub fn from_vec(data: Vec<f32>, requires_grad: bool) -> Self {
        Self::new(Array1::from(data), requires_grad)
    }

    /// Create a zero-filled tensor
    pub fn zeros(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::zeros(len), requires_grad)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &Array1<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array1<f32> {
        &mut self.data
    }

    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Snapshot of the accumulated gradient
    pub fn grad(&self) -> Option<Array1<f32>> {
        self.grad.borrow().clone()
    }

    /// Shared gradient cell (used by backward ops)
    pub fn grad_cell(&self) -> Rc<RefCell<Option<Array1<f32>>>> {
        Rc::clone(&self.grad)
    }

    /// Overwrite the gradient
    pub fn set_grad(&self, grad: Array1<f32>) {
        *self.grad.borrow_mut() = Some(grad);
    }

    /// Add to the gradient, initializing it on first use
    pub fn accumulate_grad(&self, grad: Array1<f32>) {
        let mut cell = self.grad.borrow_mut();
        match cell.as_mut() {
            Some(existing) => *existing += &grad,
            None => *cell = Some(grad),
        }
    }

    /// Drop any accumulated gradient
    pub fn zero_grad(&self) {
        *self.grad.borrow_mut() = None;
    }

    pub fn backward_op(&self) -> Option<Rc<dyn BackwardOp>> {
        self.backward_op.clone()
    }

    pub fn set_backward_op(&mut self, op: Rc<dyn BackwardOp>) {
        self.backward_op = Some(op);
    }

    /// Detached copy: same data, fresh gradient cell, no history
    pub fn detach(&self) -> Self {
        Self::new(self.data.clone(), self.requires_grad)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("len", &self.data.len())
            .field("requires_grad", &self.requires_grad)
            .field("has_grad", &self.grad.borrow().is_some())
            .field("has_backward_op", &self.backward_op.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_tensor_creation() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        assert_eq!(t.len(), 3);
        assert!(t.requires_grad());
        assert!(t.grad().is_none());
        assert!(!t.is_empty());
    }

    #[test]
    fn test_clone_shares_gradient_cell() {
        let t = Tensor::from_vec(vec![1.0, 2.0], true);
        let c = t.clone();
        c.accumulate_grad(arr1(&[1.0, 1.0]));
        assert_eq!(t.grad().unwrap(), arr1(&[1.0, 1.0]));
    }

    #[test]
    fn test_grad_accumulation() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        t.accumulate_grad(arr1(&[1.0, 1.0, 1.0]));
        t.accumulate_grad(arr1(&[1.0, 0.5, 0.0]));
        let grad = t.grad().unwrap();
        assert_eq!(grad[0], 2.0);
        assert_eq!(grad[1], 1.5);
        assert_eq!(grad[2], 1.0);
    }

    #[test]
    fn test_zero_grad() {
        let t = Tensor::from_vec(vec![1.0], true);
        t.set_grad(arr1(&[3.0]));
        t.zero_grad();
        assert!(t.grad().is_none());
    }

    #[test]
    fn test_detach_has_fresh_gradient() {
        let t = Tensor::from_vec(vec![1.0], true);
        t.set_grad(arr1(&[3.0]));
        let d = t.detach();
        assert!(d.grad().is_none());
        assert_eq!(d.data()[0], 1.0);
    }
}
