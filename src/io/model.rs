//! Named weights of a network in serialisable form

use crate::Tensor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which network a weights file belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Stage prefix, e.g. `p_net`
    pub name: String,
    /// Architecture of the provider that built the network
    pub architecture: String,
    pub version: String,
    /// Free-form annotations (epoch, loss, ...)
    #[serde(default)]
    pub custom: HashMap<String, String>,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            custom: HashMap::new(),
        }
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub len: usize,
}

/// Text-format payload: parameter table plus one flat data buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    pub metadata: ModelMetadata,
    pub parameters: Vec<ParameterInfo>,
    pub data: Vec<f32>,
}

/// Named parameter tensors with metadata
#[derive(Debug)]
pub struct Model {
    pub metadata: ModelMetadata,
    pub parameters: Vec<(String, Tensor)>,
}

impl Model {
    pub fn new(metadata: ModelMetadata, parameters: Vec<(String, Tensor)>) -> Self {
        Self {
            metadata,
            parameters,
        }
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Tensor> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    pub fn to_state(&self) -> ModelState {
        let mut data = Vec::new();
        let parameters = self
            .parameters
            .iter()
            .map(|(name, tensor)| {
                data.extend(tensor.data().iter().copied());
                ParameterInfo {
                    name: name.clone(),
                    len: tensor.len(),
                }
            })
            .collect();

        ModelState {
            metadata: self.metadata.clone(),
            parameters,
            data,
        }
    }

    /// Rebuild from a state, returning `None` if the data buffer is shorter
    /// than the parameter table claims
    pub fn from_state(state: ModelState) -> Option<Self> {
        let total: usize = state.parameters.iter().map(|p| p.len).sum();
        if total != state.data.len() {
            return None;
        }

        let mut offset = 0;
        let parameters = state
            .parameters
            .into_iter()
            .map(|info| {
                let values = state.data[offset..offset + info.len].to_vec();
                offset += info.len;
                (info.name, Tensor::from_vec(values, false))
            })
            .collect();

        Some(Self {
            metadata: state.metadata,
            parameters,
        })
    }
}
