//! Train command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, train_from_spec, validate_spec, TrainArgs, TrainSpec};

/// Apply command-line overrides on top of the loaded spec
pub fn apply_overrides(spec: &mut TrainSpec, args: &TrainArgs) {
    if let Some(epochs) = args.epochs {
        spec.training.epochs = epochs;
    }
    if let Some(initial_epoch) = args.initial_epoch {
        spec.training.initial_epoch = initial_epoch;
    }
    if let Some(lr) = args.lr {
        spec.optimizer.lr = lr;
    }
    if let Some(weights) = &args.weights {
        spec.training.weights = Some(weights.clone());
    }
}

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Training from {}", args.config.display()),
    );

    let mut spec = load_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;

    let run = train_from_spec(&spec).map_err(|e| format!("Training error: {e}"))?;
    let result = &run.outcome.result;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "✓ {} trained to epoch {} (loss {:.4}, accuracy {:.4}, {:.1}s)",
            spec.stage,
            result.final_epoch,
            result.final_loss,
            result.final_accuracy,
            result.elapsed_secs
        ),
    );
    if result.stopped_early {
        log(level, LogLevel::Normal, "  stopped early");
    }
    log(
        level,
        LogLevel::Normal,
        &format!("  Weights: {}", run.layout.model_file.display()),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Logs: {}", run.layout.log_dir.display()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_apply_overrides() {
        let mut spec: TrainSpec =
            serde_yaml::from_str("stage: refine\ndata:\n  path: r\n  batch_size: 4\n").unwrap();
        let args = TrainArgs {
            config: PathBuf::from("r.yaml"),
            epochs: Some(9),
            lr: Some(0.01),
            initial_epoch: Some(3),
            weights: Some(PathBuf::from("w.safetensors")),
        };

        apply_overrides(&mut spec, &args);

        assert_eq!(spec.training.epochs, 9);
        assert_eq!(spec.training.initial_epoch, 3);
        assert_eq!(spec.optimizer.lr, 0.01);
        assert_eq!(spec.training.weights, Some(PathBuf::from("w.safetensors")));
    }

    #[test]
    fn test_no_overrides_keeps_spec() {
        let mut spec: TrainSpec =
            serde_yaml::from_str("stage: refine\ndata:\n  path: r\n  batch_size: 4\n").unwrap();
        let before = spec.clone();
        let args = TrainArgs {
            config: PathBuf::from("r.yaml"),
            epochs: None,
            lr: None,
            initial_epoch: None,
            weights: None,
        };
        apply_overrides(&mut spec, &args);
        assert_eq!(spec, before);
    }
}
