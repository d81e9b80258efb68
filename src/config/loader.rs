//! Loading run specifications and their dataset files

use super::schema::TrainSpec;
use super::validate::validate_spec;
use crate::error::{Error, Result};
use crate::io::read_f32;
use crate::driver::StageData;
use crate::label::{LabelMap, BBOX_WIDTH, LABEL_WIDTH};
use ndarray::Array2;
use safetensors::SafeTensors;
use std::fs;
use std::path::Path;

/// Tensor names inside a dataset file
pub const IMAGES: &str = "images";
pub const LABELS: &str = "labels";
pub const BBOXES: &str = "bboxes";
pub const LANDMARKS: &str = "landmarks";

/// Read, parse and validate a YAML run specification
///
/// # Example
///
/// ```no_run
/// use mtcnn_train::config::load_spec;
///
/// let spec = load_spec("r_net.yaml")?;
/// println!("{} epochs of {}", spec.training.epochs, spec.stage);
/// # Ok::<(), mtcnn_train::Error>(())
/// ```
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<TrainSpec> {
    let yaml = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {e}",
            path.as_ref().display()
        ))
    })?;
    let spec: TrainSpec = serde_yaml::from_str(&yaml)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;
    validate_spec(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
    Ok(spec)
}

/// Load a SafeTensors dataset file.
///
/// Expects `images [N, D]`, `labels [N]` holding raw tags (`0`, `1`, `-1`,
/// `-2`), `bboxes [N, 4]` and `landmarks [N, 2P]`. Tags are encoded through
/// `labels` into the 2-wide class field.
pub fn load_stage_data<P: AsRef<Path>>(path: P, labels: &LabelMap) -> Result<StageData> {
    let bytes = fs::read(path.as_ref())?;
    let tensors = SafeTensors::deserialize(&bytes)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.as_ref().display())))?;

    let images = read_matrix(&tensors, IMAGES)?;
    let bboxes = read_matrix(&tensors, BBOXES)?;
    let landmarks = read_matrix(&tensors, LANDMARKS)?;

    let tags = read_f32(&tensors, LABELS)?;
    let n = tags.len();
    let class_field = Array2::from_shape_vec((n, LABEL_WIDTH), labels.encode_values(&tags)?)
        .map_err(|e| Error::Serialization(format!("{LABELS}: {e}")))?;

    if landmarks.ncols() % 2 != 0 {
        return Err(Error::Serialization(format!(
            "{LANDMARKS}: width {} is not a whole number of points",
            landmarks.ncols()
        )));
    }
    let fields = [
        (IMAGES, &images, images.ncols()),
        (BBOXES, &bboxes, BBOX_WIDTH),
        (LANDMARKS, &landmarks, landmarks.ncols()),
    ];
    for (name, field, width) in fields {
        if field.dim() != (n, width) {
            return Err(Error::shape(name, vec![n, width], field.shape().to_vec()));
        }
    }

    tracing::debug!(
        path = %path.as_ref().display(),
        samples = n,
        input_dim = images.ncols(),
        landmark_points = landmarks.ncols() / 2,
        "loaded dataset"
    );
    Ok(StageData {
        images,
        labels: class_field,
        bboxes,
        landmarks,
    })
}

fn read_matrix(tensors: &SafeTensors<'_>, name: &str) -> Result<Array2<f32>> {
    let shape = tensors
        .tensor(name)
        .map_err(|e| Error::Serialization(format!("tensor {name}: {e}")))?
        .shape()
        .to_vec();
    let [rows, cols] = shape[..] else {
        return Err(Error::Serialization(format!(
            "tensor {name}: expected 2 dimensions, found {shape:?}"
        )));
    };
    Array2::from_shape_vec((rows, cols), read_f32(tensors, name)?)
        .map_err(|e| Error::Serialization(format!("tensor {name}: {e}")))
}
