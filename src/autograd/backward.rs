//! Backward operation trait

/// A node in the gradient tape.
///
/// Implementations read the gradient of the tensor they produced, push the
/// corresponding gradients into their inputs, then recurse into the inputs'
/// own backward ops.
pub trait BackwardOp {
    fn backward(&self);
}
