//! mtcnn-train CLI
//!
//! # Usage
//!
//! ```bash
//! # Train one stage from a run spec
//! mtcnn-train train p_net.yaml
//!
//! # Resume with overrides
//! mtcnn-train train r_net.yaml --initial-epoch 10 --epochs 22 --weights r_net.safetensors
//!
//! # Validate a run spec
//! mtcnn-train validate o_net.yaml
//!
//! # Show a run spec and its dataset
//! mtcnn-train info o_net.yaml
//! ```

use clap::Parser;
use mtcnn_train::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
