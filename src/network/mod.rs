//! Trainable cascade networks
//!
//! The trainer only sees a [`Network`]: a forward pass over flat input rows
//! producing `[label(2), bbox(4), landmark(2P)]` prediction rows, plus named
//! parameters it can step and persist. Architectures come from a
//! [`NetworkProvider`].

mod linear;
mod stage;

pub use linear::{LinearNetwork, LinearProvider};
pub use stage::Stage;

use crate::io::{load_model, save_model, Model, ModelFormat, ModelMetadata, SaveConfig};
use crate::label::TargetLayout;
use crate::{Error, Result, Tensor};
use std::path::Path;

/// A multi-task network being trained
pub trait Network {
    fn stage(&self) -> Stage;

    /// Architecture name recorded in weights files
    fn architecture(&self) -> &str;

    /// Layout of the prediction rows
    fn layout(&self) -> TargetLayout;

    /// Width of one input row
    fn input_dim(&self) -> usize;

    /// Forward `rows` input rows, recording the tape when parameters
    /// require gradients
    fn forward(&self, inputs: &Tensor, rows: usize) -> Tensor;

    fn params(&self) -> &[Tensor];

    fn params_mut(&mut self) -> &mut [Tensor];

    /// Names matching `params()` one to one
    fn param_names(&self) -> Vec<String>;

    fn num_parameters(&self) -> usize {
        self.params().iter().map(Tensor::len).sum()
    }

    /// Human-readable parameter table
    fn summary(&self) -> String {
        let mut out = format!(
            "{} ({}) input={} output={}\n",
            self.stage(),
            self.architecture(),
            self.input_dim(),
            self.layout().width()
        );
        for (name, param) in self.param_names().iter().zip(self.params()) {
            out.push_str(&format!("  {name:<24} {:>10}\n", param.len()));
        }
        out.push_str(&format!("  total parameters: {}", self.num_parameters()));
        out
    }

    /// Write all parameters; the format follows the file extension
    fn save_weights(&self, path: &Path) -> Result<()> {
        let format = ModelFormat::from_path(path).unwrap_or(ModelFormat::SafeTensors);
        let parameters = self
            .param_names()
            .into_iter()
            .zip(self.params().iter().map(Tensor::detach))
            .collect();
        let metadata = ModelMetadata::new(self.stage().prefix(), self.architecture());
        save_model(&Model::new(metadata, parameters), path, &SaveConfig::new(format))
    }

    /// Replace every parameter with the values stored in `path`
    ///
    /// Every parameter must be present with a matching length; nothing is
    /// modified when the file does not fit.
    fn load_weights(&mut self, path: &Path) -> Result<()> {
        let model = load_model(path)?;
        let names = self.param_names();

        let mut values = Vec::with_capacity(names.len());
        for (name, param) in names.iter().zip(self.params()) {
            let stored = model.get_parameter(name).ok_or_else(|| {
                Error::WeightsMismatch(format!("{}: missing parameter '{name}'", path.display()))
            })?;
            if stored.len() != param.len() {
                return Err(Error::WeightsMismatch(format!(
                    "{}: parameter '{name}' has {} values, network expects {}",
                    path.display(),
                    stored.len(),
                    param.len()
                )));
            }
            values.push(stored.data().clone());
        }

        for (param, data) in self.params_mut().iter_mut().zip(values) {
            *param.data_mut() = data;
            param.zero_grad();
        }
        Ok(())
    }
}

/// Builds the network for a stage
pub trait NetworkProvider {
    /// `training` selects the training-mode graph
    fn build(&self, stage: Stage, training: bool) -> Result<Box<dyn Network>>;
}
