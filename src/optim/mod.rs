//! Optimizers for training the cascade networks

mod adam;
mod optimizer;

pub use adam::Adam;
pub use optimizer::Optimizer;
