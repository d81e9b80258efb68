//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, ValidateArgs};

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_spec(&args.config).map_err(|e| format!("{e}"))?;
    log(
        level,
        LogLevel::Normal,
        &format!("✓ {} is valid ({} stage)", args.config.display(), spec.stage),
    );
    if !spec.data.path.exists() {
        log(
            level,
            LogLevel::Normal,
            &format!("  warning: dataset {} does not exist yet", spec.data.path.display()),
        );
    }
    Ok(())
}
