//! Reading weights files

use super::format::ModelFormat;
use super::model::{Model, ModelMetadata, ModelState};
use super::save::ORDER_KEY;
use crate::{Error, Result, Tensor};
use std::path::Path;

/// Load a model; the format is detected from the file extension
pub fn load_model(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let format = ModelFormat::from_path(path).ok_or_else(|| {
        Error::Serialization(format!("Unsupported weights file: {}", path.display()))
    })?;

    if format == ModelFormat::SafeTensors {
        return load_safetensors(path);
    }

    let content = std::fs::read_to_string(path)?;
    let state: ModelState = match format {
        ModelFormat::Json => serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?,
        ModelFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| Error::Serialization(format!("YAML deserialization failed: {e}")))?,
        ModelFormat::SafeTensors => unreachable!(),
    };

    Model::from_state(state).ok_or_else(|| {
        Error::Serialization(format!(
            "{}: parameter table does not match data length",
            path.display()
        ))
    })
}

fn load_safetensors(path: &Path) -> Result<Model> {
    let data = std::fs::read(path)?;

    let (_, header) = safetensors::SafeTensors::read_metadata(&data)
        .map_err(|e| Error::Serialization(format!("SafeTensors parsing failed: {e}")))?;
    let custom = header.metadata().clone().unwrap_or_default();
    let field = |key: &str| custom.get(key).cloned().unwrap_or_else(|| "unknown".to_string());

    let mut metadata = ModelMetadata::new(field("name"), field("architecture"));
    if let Some(version) = custom.get("version") {
        metadata.version = version.clone();
    }
    for (key, value) in &custom {
        if !matches!(key.as_str(), "name" | "architecture" | "version" | ORDER_KEY) {
            metadata.custom.insert(key.clone(), value.clone());
        }
    }

    let tensors = safetensors::SafeTensors::deserialize(&data)
        .map_err(|e| Error::Serialization(format!("SafeTensors parsing failed: {e}")))?;

    let mut names: Vec<String> = match custom.get(ORDER_KEY) {
        Some(order) if !order.is_empty() => order.split(',').map(str::to_string).collect(),
        _ => tensors.names().into_iter().map(str::to_string).collect(),
    };
    if custom.get(ORDER_KEY).is_none() {
        names.sort();
    }

    let parameters = names
        .into_iter()
        .map(|name| {
            let values = read_f32(&tensors, &name)?;
            Ok((name, Tensor::from_vec(values, false)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Model::new(metadata, parameters))
}

/// Copy an F32 tensor out of a SafeTensors buffer
pub(crate) fn read_f32(tensors: &safetensors::SafeTensors<'_>, name: &str) -> Result<Vec<f32>> {
    let view = tensors
        .tensor(name)
        .map_err(|e| Error::Serialization(format!("tensor {name}: {e}")))?;
    if view.dtype() != safetensors::Dtype::F32 {
        return Err(Error::Serialization(format!(
            "tensor {name}: expected F32, found {:?}",
            view.dtype()
        )));
    }
    // Buffer alignment inside the file is not guaranteed
    Ok(view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}
