//! Single dense layer baseline with a softmax label head

use super::{Network, NetworkProvider, Stage};
use crate::autograd::{add_bias, matmul, softmax_columns};
use crate::label::TargetLayout;
use crate::{Result, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `softmax_label(x W + b)` over the full output row.
///
/// Small enough to train on the CPU tape and still exercise every head of
/// the multi-task loss.
pub struct LinearNetwork {
    stage: Stage,
    layout: TargetLayout,
    input_dim: usize,
    /// `[weight (input_dim x width), bias (width)]`
    params: Vec<Tensor>,
}

impl LinearNetwork {
    /// Glorot-uniform weights, zero bias
    pub fn new(stage: Stage, input_dim: usize, layout: TargetLayout, seed: u64) -> Self {
        let width = layout.width();
        let limit = (6.0 / (input_dim + width) as f32).sqrt();
        let mut rng = StdRng::seed_from_u64(seed);
        let weight: Vec<f32> = (0..input_dim * width)
            .map(|_| rng.random_range(-limit..limit))
            .collect();

        Self {
            stage,
            layout,
            input_dim,
            params: vec![
                Tensor::from_vec(weight, true),
                Tensor::zeros(width, true),
            ],
        }
    }
}

impl Network for LinearNetwork {
    fn stage(&self) -> Stage {
        self.stage
    }

    fn architecture(&self) -> &str {
        "linear"
    }

    fn layout(&self) -> TargetLayout {
        self.layout
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn forward(&self, inputs: &Tensor, rows: usize) -> Tensor {
        let width = self.layout.width();
        let logits = matmul(inputs, &self.params[0], rows, self.input_dim, width);
        let shifted = add_bias(&logits, &self.params[1], rows, width);
        softmax_columns(&shifted, rows, width, self.layout.label_columns())
    }

    fn params(&self) -> &[Tensor] {
        &self.params
    }

    fn params_mut(&mut self) -> &mut [Tensor] {
        &mut self.params
    }

    fn param_names(&self) -> Vec<String> {
        vec!["dense.weight".to_string(), "dense.bias".to_string()]
    }
}

/// Provides a [`LinearNetwork`] sized for each stage's input crop
#[derive(Debug, Clone)]
pub struct LinearProvider {
    layout: TargetLayout,
    seed: u64,
    input_dim: Option<usize>,
}

impl LinearProvider {
    pub fn new(layout: TargetLayout) -> Self {
        Self {
            layout,
            seed: 0,
            input_dim: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the stage's default `size * size * 3` input width
    pub fn with_input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = Some(input_dim);
        self
    }
}

impl NetworkProvider for LinearProvider {
    fn build(&self, stage: Stage, _training: bool) -> Result<Box<dyn Network>> {
        let input_dim = self.input_dim.unwrap_or_else(|| stage.input_dim());
        Ok(Box::new(LinearNetwork::new(
            stage,
            input_dim,
            self.layout,
            self.seed,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use approx::assert_relative_eq;

    fn network() -> LinearNetwork {
        LinearNetwork::new(Stage::Proposal, 3, TargetLayout::new(1), 42)
    }

    #[test]
    fn test_forward_shape_and_label_softmax() {
        let net = network();
        let inputs = Tensor::from_vec(vec![0.1, 0.2, 0.3, -0.4, 0.5, 0.6], false);
        let out = net.forward(&inputs, 2);

        assert_eq!(out.len(), 2 * 8);
        for row in out.data().as_slice().unwrap().chunks(8) {
            assert_relative_eq!(row[0] + row[1], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_backward_reaches_parameters() {
        let net = network();
        let inputs = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
        let out = net.forward(&inputs, 1);
        let mut out = out;
        crate::autograd::backward(&mut out, None);

        assert!(net.params()[0].grad().is_some());
        assert!(net.params()[1].grad().is_some());
    }

    #[test]
    fn test_same_seed_same_weights() {
        let a = network();
        let b = network();
        assert_eq!(a.params()[0].data(), b.params()[0].data());
    }

    #[test]
    fn test_provider_uses_stage_geometry() {
        let provider = LinearProvider::new(TargetLayout::default());
        let net = provider.build(Stage::Refine, true).unwrap();
        assert_eq!(net.input_dim(), 24 * 24 * 3);
        assert_eq!(net.num_parameters(), 24 * 24 * 3 * 16 + 16);
        assert!(net.summary().contains("dense.weight"));
    }

    #[test]
    fn test_weights_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p_net.safetensors");

        let trained = network();
        trained.save_weights(&path).unwrap();

        let mut fresh = LinearNetwork::new(Stage::Proposal, 3, TargetLayout::new(1), 7);
        assert_ne!(fresh.params()[0].data(), trained.params()[0].data());
        fresh.load_weights(&path).unwrap();
        assert_eq!(fresh.params()[0].data(), trained.params()[0].data());
    }

    #[test]
    fn test_load_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        LinearNetwork::new(Stage::Proposal, 4, TargetLayout::new(1), 1)
            .save_weights(&path)
            .unwrap();

        let mut net = network();
        let before = net.params()[0].data().clone();
        let err = net.load_weights(&path).unwrap_err();
        assert!(matches!(err, Error::WeightsMismatch(_)));
        assert_eq!(net.params()[0].data(), &before);
    }

    #[test]
    fn test_load_missing_file_propagates_io_error() {
        let mut net = network();
        let err = net
            .load_weights(std::path::Path::new("/nonexistent/p_net.safetensors"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
