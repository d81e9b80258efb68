//! End-to-end stage training from a YAML run spec

use mtcnn_train::config::{load_spec, train_from_spec, train_from_yaml, TrainSpec};
use mtcnn_train::network::Stage;
use mtcnn_train::train::{EpochRecord, ScalarLogger};
use mtcnn_train::Error;
use safetensors::tensor::TensorView;
use safetensors::Dtype;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INPUT_DIM: usize = 6;
const SAMPLES: usize = 12;

/// Tags cycle positive, negative, partial, landmark
fn write_dataset(path: &Path, samples: usize) {
    let tags: Vec<f32> = (0..samples).map(|i| [1.0, 0.0, -1.0, -2.0][i % 4]).collect();
    let images: Vec<f32> = (0..samples * INPUT_DIM)
        .map(|k| {
            let (i, j) = (k / INPUT_DIM, k % INPUT_DIM);
            if j == i % 4 { 1.0 } else { 0.0 }
        })
        .collect();
    let bboxes: Vec<f32> = (0..samples * 4).map(|k| (k % 5) as f32 * 0.05).collect();
    let landmarks: Vec<f32> = (0..samples * 4).map(|k| (k % 3) as f32 * 0.1).collect();

    let buffers = [
        ("images", images, vec![samples, INPUT_DIM]),
        ("labels", tags, vec![samples]),
        ("bboxes", bboxes, vec![samples, 4]),
        ("landmarks", landmarks, vec![samples, 4]),
    ];
    let bytes: Vec<Vec<u8>> = buffers
        .iter()
        .map(|(_, data, _)| bytemuck::cast_slice(data).to_vec())
        .collect();
    let views: Vec<(&str, TensorView<'_>)> = buffers
        .iter()
        .zip(&bytes)
        .map(|((name, _, shape), raw)| (*name, TensorView::new(Dtype::F32, shape.clone(), raw).unwrap()))
        .collect();
    fs::write(path, safetensors::serialize(views, None).unwrap()).unwrap();
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self::with_samples(SAMPLES)
    }

    fn with_samples(samples: usize) -> Self {
        let ws = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        write_dataset(&ws.data_path(), samples);
        ws
    }

    fn data_path(&self) -> PathBuf {
        self.dir.path().join("data.safetensors")
    }

    fn log_root(&self) -> PathBuf {
        self.dir.path().join("runs")
    }

    fn spec(&self, stage: &str, extra: &str) -> PathBuf {
        let yaml = format!(
            "stage: {stage}\ndata:\n  path: {}\n  batch_size: 4\n{extra}output:\n  log_root: {}\n",
            self.data_path().display(),
            self.log_root().display()
        );
        let path = self.dir.path().join(format!("{stage}.yaml"));
        fs::write(&path, yaml).unwrap();
        path
    }
}

fn scalars(log_dir: &Path) -> Vec<EpochRecord> {
    ScalarLogger::read(&log_dir.join(ScalarLogger::FILE_NAME)).unwrap()
}

#[test]
fn proposal_run_writes_checkpoint_and_logs() {
    let ws = Workspace::new();
    let config = ws.spec("proposal", "training:\n  epochs: 3\n  seed: 1\n");

    let run = train_from_yaml(&config).unwrap();

    assert_eq!(run.outcome.network.stage(), Stage::Proposal);
    assert_eq!(run.outcome.result.epochs_run, 3);
    assert!(run.layout.run_dir.starts_with(ws.log_root()));
    assert!(run.layout.model_file.is_file());

    let file_name = run.layout.model_file.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("p_net_3_"));
    assert!(file_name.ends_with(".safetensors"));

    let records = scalars(&run.layout.log_dir);
    let epochs: Vec<usize> = records.iter().map(|r| r.epoch).collect();
    assert_eq!(epochs, vec![0, 1, 2]);
    assert!(records.iter().all(|r| r.loss.is_finite() && r.lr > 0.0));
}

#[test]
fn refine_run_resumes_from_checkpoint() {
    let ws = Workspace::new();
    let first = train_from_yaml(ws.spec("refine", "training:\n  epochs: 2\n  seed: 3\n")).unwrap();

    let mut spec: TrainSpec = load_spec(ws.spec("refine", "training:\n  epochs: 4\n  seed: 3\n")).unwrap();
    spec.training.initial_epoch = 2;
    spec.training.weights = Some(first.layout.model_file.clone());

    let resumed = train_from_spec(&spec).unwrap();

    assert_eq!(resumed.outcome.result.epochs_run, 2);
    assert_eq!(resumed.outcome.result.final_epoch, 4);
    let epochs: Vec<usize> = scalars(&resumed.layout.log_dir).iter().map(|r| r.epoch).collect();
    assert_eq!(epochs, vec![2, 3]);
}

#[test]
fn missing_initial_weights_fail_the_run() {
    let ws = Workspace::new();
    let config = ws.spec(
        "output",
        "training:\n  epochs: 2\n  weights: /nonexistent/o_net.safetensors\n",
    );

    let err = train_from_yaml(&config).err().unwrap();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn output_stage_streams_batches() {
    let ws = Workspace::new();
    let config = ws.spec(
        "output",
        "  generator: true\n  steps_per_epoch: 5\ntraining:\n  epochs: 2\n  seed: 4\n",
    );

    let run = train_from_yaml(&config).unwrap();

    assert_eq!(run.outcome.network.stage(), Stage::Output);
    assert_eq!(run.outcome.result.epochs_run, 2);
    let records = scalars(&run.layout.log_dir);
    assert_eq!(records.len(), 2);
    // Adam decay lowers the effective rate as steps accumulate
    assert!(records[1].lr < 0.001);
}

#[test]
fn invalid_spec_is_rejected_before_training() {
    let ws = Workspace::new();
    let config = ws.spec("refine", "  generator: true\n");

    let err = train_from_yaml(&config).err().unwrap();
    assert!(matches!(err, Error::ConfigError(_)));
    assert!(!ws.log_root().exists());
}

#[test]
fn streaming_an_empty_dataset_is_a_config_error() {
    let ws = Workspace::with_samples(0);
    let config = ws.spec("output", "  generator: true\ntraining:\n  epochs: 2\n");

    let err = train_from_yaml(config).err().unwrap();

    assert!(matches!(err, Error::ConfigError(_)));
}
