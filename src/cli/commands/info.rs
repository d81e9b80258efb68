//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, load_stage_data, InfoArgs, TrainSpec};

/// Format the run spec as an indented summary
pub fn format_spec(spec: &TrainSpec) -> String {
    let mut lines = vec![
        format!("Stage: {} ({})", spec.stage.name(), spec.stage.prefix()),
        format!("  Dataset: {}", spec.data.path.display()),
        format!("  Batch size: {}", spec.data.batch_size),
    ];
    if spec.data.generator {
        let steps = spec
            .data
            .steps_per_epoch
            .map_or_else(|| "one pass".to_string(), |s| s.to_string());
        lines.push(format!("  Streaming: {steps} per epoch"));
    }
    lines.push(format!(
        "  Epochs: {}..{}",
        spec.training.initial_epoch, spec.training.epochs
    ));
    if let Some(weights) = &spec.training.weights {
        lines.push(format!("  Initial weights: {}", weights.display()));
    }
    lines.push(format!("  Learning rate: {}", spec.optimizer.lr));
    if let Some(decay) = spec.optimizer.decay {
        lines.push(format!("  Decay: {decay}"));
    }
    lines.push(format!("  Log root: {}", spec.output.log_root.display()));
    lines.join("\n")
}

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_spec(&args.config).map_err(|e| format!("{e}"))?;
    log(level, LogLevel::Normal, &format_spec(&spec));

    match load_stage_data(&spec.data.path, &spec.labels) {
        Ok(data) => log(
            level,
            LogLevel::Normal,
            &format!(
                "  Samples: {} (input {}, {} landmark points)",
                data.len(),
                data.input_dim(),
                data.layout().landmark_points()
            ),
        ),
        Err(e) => log(level, LogLevel::Normal, &format!("  Dataset unavailable: {e}")),
    }
    Ok(())
}
