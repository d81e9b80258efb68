//! The four stage training entry points

use crate::label::TargetLayout;
use crate::network::{Network, NetworkProvider, Stage};
use crate::optim::{Adam, Optimizer};
use crate::train::{
    Batch, Dataset, LabelAccuracy, MultiTaskLoss, TrainConfig, TrainResult, Trainer,
    TrainerCallback,
};
use crate::{Error, Result};
use ndarray::{Array2, ArrayView2};
use std::path::PathBuf;

pub const DEFAULT_EPOCHS: usize = 1000;
pub const DEFAULT_LR: f32 = 0.001;
/// Learning-rate decay of the streaming output-stage variant
pub const GENERATOR_DECAY: f32 = 1e-4;

/// Knobs shared by every stage entry point
pub struct StageOptions {
    /// First epoch to run; later epochs continue its numbering
    pub initial_epoch: usize,
    /// Epoch to stop at (exclusive)
    pub epochs: usize,
    pub lr: f32,
    /// Adam learning-rate decay; `None` keeps the stage default
    pub decay: Option<f32>,
    /// Weights to start from instead of the provider's initialization
    pub weights: Option<PathBuf>,
    pub callbacks: Vec<Box<dyn TrainerCallback>>,
    pub config: TrainConfig,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            initial_epoch: 0,
            epochs: DEFAULT_EPOCHS,
            lr: DEFAULT_LR,
            decay: None,
            weights: None,
            callbacks: Vec::new(),
            config: TrainConfig::default(),
        }
    }
}

impl StageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_initial_epoch(mut self, initial_epoch: usize) -> Self {
        self.initial_epoch = initial_epoch;
        self
    }

    pub fn with_lr(mut self, lr: f32) -> Self {
        self.lr = lr;
        self
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = Some(decay);
        self
    }

    pub fn with_weights(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights = Some(path.into());
        self
    }

    pub fn with_callback<C: TrainerCallback + 'static>(mut self, callback: C) -> Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    pub fn with_callbacks(mut self, callbacks: Vec<Box<dyn TrainerCallback>>) -> Self {
        self.callbacks.extend(callbacks);
        self
    }

    pub fn with_config(mut self, config: TrainConfig) -> Self {
        self.config = config;
        self
    }
}

/// A trained network together with how its fit call ended
pub struct StageOutcome {
    pub network: Box<dyn Network>,
    pub result: TrainResult,
}

/// Arrays making up an in-memory training set.
///
/// `labels` is the encoded `[n, 2]` class field, `landmarks` is `[n, 2P]`.
#[derive(Debug, Clone, Copy)]
pub struct StageArrays<'a> {
    pub images: ArrayView2<'a, f32>,
    pub labels: ArrayView2<'a, f32>,
    pub bboxes: ArrayView2<'a, f32>,
    pub landmarks: ArrayView2<'a, f32>,
}

/// Owned counterpart of [`StageArrays`], as read from a dataset file
#[derive(Debug, Clone, PartialEq)]
pub struct StageData {
    pub images: Array2<f32>,
    pub labels: Array2<f32>,
    pub bboxes: Array2<f32>,
    pub landmarks: Array2<f32>,
}

impl StageData {
    pub fn len(&self) -> usize {
        self.images.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.images.nrows() == 0
    }

    pub fn input_dim(&self) -> usize {
        self.images.ncols()
    }

    /// Target layout implied by the landmark width
    pub fn layout(&self) -> TargetLayout {
        TargetLayout::new(self.landmarks.ncols() / 2)
    }

    pub fn view(&self) -> StageArrays<'_> {
        StageArrays {
            images: self.images.view(),
            labels: self.labels.view(),
            bboxes: self.bboxes.view(),
            landmarks: self.landmarks.view(),
        }
    }

    /// Concatenate the targets into a [`Dataset`]
    pub fn to_dataset(&self) -> Result<Dataset> {
        let v = self.view();
        Dataset::from_parts(v.images, v.labels, v.bboxes, v.landmarks, self.layout())
    }
}

/// Train the proposal network on 12x12 crops
pub fn train_proposal_net(
    provider: &dyn NetworkProvider,
    data: StageArrays<'_>,
    batch_size: usize,
    options: StageOptions,
) -> Result<StageOutcome> {
    train_on_arrays(provider, Stage::Proposal, data, batch_size, options)
}

/// Train the refinement network on 24x24 crops
pub fn train_refine_net(
    provider: &dyn NetworkProvider,
    data: StageArrays<'_>,
    batch_size: usize,
    options: StageOptions,
) -> Result<StageOutcome> {
    train_on_arrays(provider, Stage::Refine, data, batch_size, options)
}

/// Train the output network on 48x48 crops
pub fn train_output_net(
    provider: &dyn NetworkProvider,
    data: StageArrays<'_>,
    batch_size: usize,
    options: StageOptions,
) -> Result<StageOutcome> {
    train_on_arrays(provider, Stage::Output, data, batch_size, options)
}

/// Train the output network from a batch stream.
///
/// Each epoch draws `steps_per_epoch` batches. Adam runs with
/// [`GENERATOR_DECAY`] here.
pub fn train_output_net_with_generator<I>(
    provider: &dyn NetworkProvider,
    generator: &mut I,
    steps_per_epoch: usize,
    options: StageOptions,
) -> Result<StageOutcome>
where
    I: Iterator<Item = Batch>,
{
    if steps_per_epoch == 0 {
        return Err(Error::ConfigError(
            "steps per epoch must be positive; is the dataset empty?".to_string(),
        ));
    }
    let decay = options.decay.unwrap_or(GENERATOR_DECAY);
    let optimizer = Adam::default_params(options.lr).with_decay(decay);
    let (initial_epoch, epochs) = (options.initial_epoch, options.epochs);
    let mut trainer = prepare(provider, Stage::Output, Box::new(optimizer), options)?;
    let result = trainer.fit_generator(generator, steps_per_epoch, initial_epoch, epochs)?;
    Ok(StageOutcome {
        network: trainer.into_network(),
        result,
    })
}

fn train_on_arrays(
    provider: &dyn NetworkProvider,
    stage: Stage,
    data: StageArrays<'_>,
    batch_size: usize,
    options: StageOptions,
) -> Result<StageOutcome> {
    let optimizer = Adam::default_params(options.lr).with_decay(options.decay.unwrap_or(0.0));
    let (initial_epoch, epochs) = (options.initial_epoch, options.epochs);
    let mut trainer = prepare(provider, stage, Box::new(optimizer), options)?;

    let network = trainer.network();
    let dataset = to_dataset(data, network.layout(), network.input_dim())?;
    tracing::info!(stage = %stage, samples = dataset.len(), batch_size, "dataset ready");

    let result = trainer.fit(&dataset, batch_size, initial_epoch, epochs)?;
    Ok(StageOutcome {
        network: trainer.into_network(),
        result,
    })
}

fn to_dataset(data: StageArrays<'_>, layout: TargetLayout, input_dim: usize) -> Result<Dataset> {
    if data.images.ncols() != input_dim {
        return Err(Error::shape(
            "images",
            vec![data.images.nrows(), input_dim],
            vec![data.images.nrows(), data.images.ncols()],
        ));
    }
    Dataset::from_parts(data.images, data.labels, data.bboxes, data.landmarks, layout)
}

/// Build, optionally restore, and compile the stage network
fn prepare(
    provider: &dyn NetworkProvider,
    stage: Stage,
    optimizer: Box<dyn Optimizer>,
    options: StageOptions,
) -> Result<Trainer> {
    let mut network = provider.build(stage, true)?;
    tracing::info!("{}", network.summary());

    if let Some(path) = &options.weights {
        network.load_weights(path)?;
        tracing::info!(path = %path.display(), "loaded initial weights");
    }

    let layout = network.layout();
    let mut trainer = Trainer::new(network, optimizer, options.config);
    trainer.compile(
        Box::new(MultiTaskLoss::new(layout)),
        Box::new(LabelAccuracy::new(layout)),
    );
    for callback in options.callbacks {
        trainer.add_boxed_callback(callback);
    }
    Ok(trainer)
}
