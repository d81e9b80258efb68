//! Autograd operations with backward passes

mod activations;
mod basic;
mod matmul;

pub use activations::softmax_columns;
pub use basic::add_bias;
pub use matmul::{matmul, matmul_compute, transpose};
