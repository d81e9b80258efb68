//! Raw sample tags and their encoded class-field vectors

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of training sample produced by the cascade's data generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    /// Crop with low overlap to any face (tag `0`)
    Negative,
    /// Crop tightly around a face (tag `1`)
    Positive,
    /// Crop partially overlapping a face (tag `-1`)
    Partial,
    /// Crop carrying landmark annotations only (tag `-2`)
    Landmark,
}

impl SampleKind {
    pub const ALL: [SampleKind; 4] = [
        SampleKind::Negative,
        SampleKind::Positive,
        SampleKind::Partial,
        SampleKind::Landmark,
    ];

    /// Raw tag as written by the data generator
    pub fn tag(self) -> &'static str {
        match self {
            SampleKind::Negative => "0",
            SampleKind::Positive => "1",
            SampleKind::Partial => "-1",
            SampleKind::Landmark => "-2",
        }
    }

    /// Decode a numeric tag as stored in dataset files
    pub fn from_value(value: f32) -> Result<Self> {
        match value.round() as i32 {
            0 => Ok(SampleKind::Negative),
            1 => Ok(SampleKind::Positive),
            -1 => Ok(SampleKind::Partial),
            -2 => Ok(SampleKind::Landmark),
            _ => Err(Error::UnknownSampleTag(value.to_string())),
        }
    }
}

impl FromStr for SampleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(SampleKind::Negative),
            "1" => Ok(SampleKind::Positive),
            "-1" => Ok(SampleKind::Partial),
            "-2" => Ok(SampleKind::Landmark),
            other => Err(Error::UnknownSampleTag(other.to_string())),
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleKind::Negative => "negative",
            SampleKind::Positive => "positive",
            SampleKind::Partial => "partial",
            SampleKind::Landmark => "landmark",
        };
        write!(f, "{name}")
    }
}

/// Table from sample kind to the 2-wide class field written into targets.
///
/// Built once at start-up and passed to both batch construction and the
/// loss/metric code so the two always agree on the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelMap {
    pub negative: [f32; 2],
    pub positive: [f32; 2],
    pub partial: [f32; 2],
    pub landmark: [f32; 2],
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            negative: [0.0, 0.0],
            positive: [1.0, 1.0],
            partial: [1.0, 0.0],
            landmark: [0.0, 1.0],
        }
    }
}

impl LabelMap {
    pub fn encode(&self, kind: SampleKind) -> [f32; 2] {
        match kind {
            SampleKind::Negative => self.negative,
            SampleKind::Positive => self.positive,
            SampleKind::Partial => self.partial,
            SampleKind::Landmark => self.landmark,
        }
    }

    /// Encode a raw string tag (`"0"`, `"1"`, `"-1"`, `"-2"`)
    pub fn encode_tag(&self, tag: &str) -> Result<[f32; 2]> {
        Ok(self.encode(tag.parse()?))
    }

    /// Encode a column of numeric tags into a flat `[n * 2]` class field
    pub fn encode_values(&self, tags: &[f32]) -> Result<Vec<f32>> {
        let mut out = Vec::with_capacity(tags.len() * 2);
        for &tag in tags {
            out.extend_from_slice(&self.encode(SampleKind::from_value(tag)?));
        }
        Ok(out)
    }
}
