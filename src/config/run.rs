//! Main entry points for YAML-driven stage training

use super::loader::{load_spec, load_stage_data};
use super::schema::TrainSpec;
use crate::driver::{
    train_output_net, train_output_net_with_generator, train_proposal_net, train_refine_net,
    RunLayout, StageData, StageOptions, StageOutcome,
};
use crate::network::{LinearProvider, NetworkProvider, Stage};
use crate::train::TrainConfig;
use crate::Result;
use std::path::Path;

/// A finished run and where it wrote its outputs
pub struct TrainedRun {
    pub layout: RunLayout,
    pub outcome: StageOutcome,
}

/// Train the stage described by a YAML file
///
/// # Example
///
/// ```no_run
/// use mtcnn_train::config::train_from_yaml;
///
/// let run = train_from_yaml("p_net.yaml")?;
/// println!("weights at {}", run.layout.model_file.display());
/// # Ok::<(), mtcnn_train::Error>(())
/// ```
pub fn train_from_yaml<P: AsRef<Path>>(config_path: P) -> Result<TrainedRun> {
    let spec = load_spec(config_path)?;
    train_from_spec(&spec)
}

/// Train with the baseline [`LinearProvider`] network
pub fn train_from_spec(spec: &TrainSpec) -> Result<TrainedRun> {
    let data = load_stage_data(&spec.data.path, &spec.labels)?;
    let provider = LinearProvider::new(data.layout())
        .with_input_dim(data.input_dim())
        .with_seed(spec.training.seed.unwrap_or(0));
    train_stage(spec, &provider, &data)
}

/// Train with a caller-supplied network provider
pub fn train_with_provider(spec: &TrainSpec, provider: &dyn NetworkProvider) -> Result<TrainedRun> {
    let data = load_stage_data(&spec.data.path, &spec.labels)?;
    train_stage(spec, provider, &data)
}

fn train_stage(
    spec: &TrainSpec,
    provider: &dyn NetworkProvider,
    data: &StageData,
) -> Result<TrainedRun> {
    let layout = RunLayout::create(&spec.output.log_root, spec.stage, spec.training.epochs)?;

    let options =
        stage_options(spec).with_callbacks(layout.default_callbacks(spec.training.log_interval));
    let batch_size = spec.data.batch_size;

    let outcome = match spec.stage {
        Stage::Proposal => train_proposal_net(provider, data.view(), batch_size, options)?,
        Stage::Refine => train_refine_net(provider, data.view(), batch_size, options)?,
        Stage::Output if spec.data.generator => {
            let mut generator = data
                .to_dataset()?
                .generator(batch_size, spec.training.seed);
            let steps = spec
                .data
                .steps_per_epoch
                .unwrap_or_else(|| generator.steps_per_pass());
            train_output_net_with_generator(provider, &mut generator, steps, options)?
        }
        Stage::Output => train_output_net(provider, data.view(), batch_size, options)?,
    };

    Ok(TrainedRun { layout, outcome })
}

fn stage_options(spec: &TrainSpec) -> StageOptions {
    let mut config = TrainConfig::new()
        .with_log_interval(spec.training.log_interval)
        .with_shuffle(spec.training.shuffle);
    if let Some(seed) = spec.training.seed {
        config = config.with_seed(seed);
    }

    let mut options = StageOptions::new()
        .with_epochs(spec.training.epochs)
        .with_initial_epoch(spec.training.initial_epoch)
        .with_lr(spec.optimizer.lr)
        .with_config(config);
    if let Some(decay) = spec.optimizer.decay {
        options = options.with_decay(decay);
    }
    if let Some(weights) = &spec.training.weights {
        options = options.with_weights(weights);
    }
    options
}
