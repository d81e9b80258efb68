//! Broadcast bias add

use crate::autograd::{BackwardOp, Tensor};
use ndarray::{Array1, ArrayView2, Axis};
use std::cell::RefCell;
use std::rc::Rc;

/// Add a bias vector to every row of a row-major `rows x cols` matrix
pub fn add_bias(x: &Tensor, bias: &Tensor, rows: usize, cols: usize) -> Tensor {
    assert_eq!(x.len(), rows * cols, "Matrix size mismatch");
    assert_eq!(bias.len(), cols, "Bias length must equal column count");

    let mut data = x.data().clone();
    for (i, v) in data.iter_mut().enumerate() {
        *v += bias.data()[i % cols];
    }

    let requires_grad = x.requires_grad() || bias.requires_grad();
    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        let backward_op = Rc::new(AddBiasBackward {
            x: x.clone(),
            bias: bias.clone(),
            rows,
            cols,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct AddBiasBackward {
    x: Tensor,
    bias: Tensor,
    rows: usize,
    cols: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for AddBiasBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.x.requires_grad() {
                self.x.accumulate_grad(grad.clone());
            }
            if self.bias.requires_grad() {
                // ∂L/∂bias = column sums of ∂L/∂out
                let grad_2d = ArrayView2::from_shape(
                    (self.rows, self.cols),
                    grad.as_slice().expect("gradient must be contiguous"),
                )
                .expect("gradient shape mismatch");
                self.bias.accumulate_grad(grad_2d.sum_axis(Axis(0)));
            }

            if let Some(op) = self.x.backward_op() {
                op.backward();
            }
            if let Some(op) = self.bias.backward_op() {
                op.backward();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;

    #[test]
    fn test_add_bias_forward() {
        let x = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false);
        let bias = Tensor::from_vec(vec![10.0, 20.0, 30.0], false);
        let y = add_bias(&x, &bias, 2, 3);
        assert_eq!(y.data().to_vec(), vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    }

    #[test]
    fn test_add_bias_backward_sums_rows() {
        let x = Tensor::from_vec(vec![0.0; 6], true);
        let bias = Tensor::from_vec(vec![0.0; 3], true);
        let mut y = add_bias(&x, &bias, 2, 3);

        backward(&mut y, Some(Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])));

        assert_eq!(bias.grad().unwrap().to_vec(), vec![5.0, 7.0, 9.0]);
        assert_eq!(x.grad().unwrap().to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
