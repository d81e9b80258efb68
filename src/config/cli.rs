//! Command-line argument types

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Train the three MTCNN cascade stages with OHEM multi-task loss
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "mtcnn-train")]
#[command(version)]
#[command(about = "Stage-by-stage trainer for the MTCNN face detection cascade")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train one stage from a YAML run spec
    Train(TrainArgs),

    /// Validate a run spec without training
    Validate(ValidateArgs),

    /// Display a run spec and its dataset
    Info(InfoArgs),
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to YAML run spec
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override the epoch to stop at
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override the learning rate
    #[arg(short, long)]
    pub lr: Option<f32>,

    /// Override the epoch to start from
    #[arg(long)]
    pub initial_epoch: Option<usize>,

    /// Resume from these weights
    #[arg(short, long)]
    pub weights: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML run spec
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML run spec
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}
