//! The three cascade stages

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One network of the detection cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// P-Net, 12x12 crops
    Proposal,
    /// R-Net, 24x24 crops
    Refine,
    /// O-Net, 48x48 crops
    Output,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Proposal, Stage::Refine, Stage::Output];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Proposal => "proposal",
            Stage::Refine => "refine",
            Stage::Output => "output",
        }
    }

    /// File and directory prefix for runs of this stage
    pub fn prefix(self) -> &'static str {
        match self {
            Stage::Proposal => "p_net",
            Stage::Refine => "r_net",
            Stage::Output => "o_net",
        }
    }

    /// Side length of the square input crop
    pub fn input_size(self) -> usize {
        match self {
            Stage::Proposal => 12,
            Stage::Refine => 24,
            Stage::Output => 48,
        }
    }

    /// Flattened RGB input width
    pub fn input_dim(self) -> usize {
        let s = self.input_size();
        s * s * 3
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "proposal" | "p_net" | "pnet" | "p" => Ok(Stage::Proposal),
            "refine" | "r_net" | "rnet" | "r" => Ok(Stage::Refine),
            "output" | "o_net" | "onet" | "o" => Ok(Stage::Output),
            _ => Err(Error::UnknownStage(s.to_string())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
