//! Writing weights files

use super::format::{ModelFormat, SaveConfig};
use super::model::Model;
use crate::{Error, Result};
use safetensors::tensor::{Dtype, TensorView};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Metadata key holding the comma-separated parameter order
pub(crate) const ORDER_KEY: &str = "parameter_order";

/// Save a model, creating parent directories as needed
///
/// # Example
///
/// ```no_run
/// use mtcnn_train::io::{save_model, Model, ModelFormat, ModelMetadata, SaveConfig};
/// use mtcnn_train::Tensor;
///
/// let params = vec![("dense.weight".to_string(), Tensor::from_vec(vec![1.0, 2.0], true))];
/// let model = Model::new(ModelMetadata::new("p_net", "linear"), params);
///
/// save_model(&model, "p_net.safetensors", &SaveConfig::new(ModelFormat::SafeTensors)).unwrap();
/// ```
pub fn save_model(model: &Model, path: impl AsRef<Path>, config: &SaveConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let bytes = match config.format {
        ModelFormat::Json => {
            let state = model.to_state();
            let text = if config.pretty {
                serde_json::to_string_pretty(&state)
            } else {
                serde_json::to_string(&state)
            };
            text.map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?
                .into_bytes()
        }
        ModelFormat::Yaml => serde_yaml::to_string(&model.to_state())
            .map_err(|e| Error::Serialization(format!("YAML serialization failed: {e}")))?
            .into_bytes(),
        ModelFormat::SafeTensors => to_safetensors(model)?,
    };

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

fn to_safetensors(model: &Model) -> Result<Vec<u8>> {
    let buffers: Vec<(&str, Vec<u8>, Vec<usize>)> = model
        .parameters
        .iter()
        .map(|(name, tensor)| {
            let values: Vec<f32> = tensor.data().to_vec();
            let bytes = bytemuck::cast_slice(&values).to_vec();
            (name.as_str(), bytes, vec![tensor.len()])
        })
        .collect();

    let views = buffers
        .iter()
        .map(|(name, bytes, shape)| {
            TensorView::new(Dtype::F32, shape.clone(), bytes)
                .map(|view| (*name, view))
                .map_err(|e| Error::Serialization(format!("invalid tensor {name}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut metadata: HashMap<String, String> = model.metadata.custom.clone();
    metadata.insert("name".to_string(), model.metadata.name.clone());
    metadata.insert("architecture".to_string(), model.metadata.architecture.clone());
    metadata.insert("version".to_string(), model.metadata.version.clone());
    let order: Vec<&str> = model.parameters.iter().map(|(n, _)| n.as_str()).collect();
    metadata.insert(ORDER_KEY.to_string(), order.join(","));

    safetensors::serialize(views, Some(metadata))
        .map_err(|e| Error::Serialization(format!("SafeTensors serialization failed: {e}")))
}
