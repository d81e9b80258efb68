//! Activation autograd operations: row-wise softmax over a column range

use crate::autograd::{BackwardOp, Tensor};
use ndarray::Array1;
use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

/// Softmax applied independently to `columns` of every row of a row-major
/// `rows x cols` matrix. Columns outside the range pass through unchanged.
///
/// This is how a multi-task head turns the label logits into class
/// probabilities while leaving the regression outputs linear.
pub fn softmax_columns(a: &Tensor, rows: usize, cols: usize, columns: Range<usize>) -> Tensor {
    assert_eq!(a.len(), rows * cols, "Matrix size mismatch");
    assert!(columns.end <= cols, "Softmax columns out of range");

    let mut data = a.data().clone();
    for r in 0..rows {
        let row = &mut data.as_slice_mut().expect("tensor data must be contiguous")
            [r * cols + columns.start..r * cols + columns.end];
        let max_val = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut sum_exp = 0.0;
        for v in row.iter_mut() {
            *v = (*v - max_val).exp();
            sum_exp += *v;
        }
        for v in row.iter_mut() {
            *v /= sum_exp;
        }
    }

    let requires_grad = a.requires_grad();
    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        let backward_op = Rc::new(SoftmaxColumnsBackward {
            a: a.clone(),
            output: result.data().clone(),
            rows,
            cols,
            columns,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct SoftmaxColumnsBackward {
    a: Tensor,
    output: Array1<f32>,
    rows: usize,
    cols: usize,
    columns: Range<usize>,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for SoftmaxColumnsBackward {
    fn backward(&self) {
        if let Some(grad_output) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                // ∂L/∂x = y ⊙ (∂L/∂y - (y · ∂L/∂y)) inside the softmax block
                let mut grad_a = grad_output.clone();
                for r in 0..self.rows {
                    let start = r * self.cols + self.columns.start;
                    let end = r * self.cols + self.columns.end;
                    let dot: f32 = (start..end)
                        .map(|i| self.output[i] * grad_output[i])
                        .sum();
                    for i in start..end {
                        grad_a[i] = self.output[i] * (grad_output[i] - dot);
                    }
                }
                self.a.accumulate_grad(grad_a);
            }

            if let Some(op) = self.a.backward_op() {
                op.backward();
            }
        }
    }
}
