//! Weight file formats

use std::path::Path;

/// On-disk encoding of a weights file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Yaml,
    /// Binary, HuggingFace compatible
    SafeTensors,
}

impl ModelFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ModelFormat::Json),
            "yaml" | "yml" => Some(ModelFormat::Yaml),
            "safetensors" => Some(ModelFormat::SafeTensors),
            _ => None,
        }
    }

    /// Detect the format of a path from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            ModelFormat::Json => "json",
            ModelFormat::Yaml => "yaml",
            ModelFormat::SafeTensors => "safetensors",
        }
    }
}

/// Options for [`save_model`](super::save_model)
#[derive(Debug, Clone)]
pub struct SaveConfig {
    pub format: ModelFormat,
    /// Indent text formats
    pub pretty: bool,
}

impl SaveConfig {
    pub fn new(format: ModelFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ModelFormat::from_extension("JSON"), Some(ModelFormat::Json));
        assert_eq!(ModelFormat::from_extension("yml"), Some(ModelFormat::Yaml));
        assert_eq!(
            ModelFormat::from_extension("safetensors"),
            Some(ModelFormat::SafeTensors)
        );
        assert_eq!(ModelFormat::from_extension("h5"), None);
    }

    #[test]
    fn test_format_from_path() {
        let path = Path::new("runs/p_net_30_20240101_000000.000000.safetensors");
        assert_eq!(ModelFormat::from_path(path), Some(ModelFormat::SafeTensors));
        assert_eq!(ModelFormat::from_path(Path::new("weights")), None);
    }

    #[test]
    fn test_extension_round_trip() {
        for format in [ModelFormat::Json, ModelFormat::Yaml, ModelFormat::SafeTensors] {
            assert_eq!(ModelFormat::from_extension(format.extension()), Some(format));
        }
    }
}
