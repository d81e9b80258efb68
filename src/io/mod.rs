//! Weights persistence
//!
//! Networks save and restore their named parameters through [`Model`] in
//! JSON, YAML or SafeTensors, chosen by file extension.

mod format;
mod load;
mod model;
mod save;

pub use format::{ModelFormat, SaveConfig};
pub use load::load_model;
pub(crate) use load::read_f32;
pub use model::{Model, ModelMetadata, ModelState, ParameterInfo};
pub use save::save_model;
