//! Configuration for the deviation report.

use crate::analysis::LabelSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a report run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Class values on the confusion-matrix axes
    #[serde(default)]
    pub labels: LabelSet,

    /// Processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// Input dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the JSON dataset
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the PNG artifacts are written to (created if absent)
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Image width in pixels
    #[serde(default = "default_image_width")]
    pub image_width: u32,

    /// Image height in pixels
    #[serde(default = "default_image_height")]
    pub image_height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            image_width: default_image_width(),
            image_height: default_image_height(),
        }
    }
}

/// Processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Render the charts on the rayon pool instead of one after another
    #[serde(default)]
    pub parallel_render: bool,

    /// Rayon thread pool size (null = num CPUs)
    #[serde(default)]
    pub rayon_threads: Option<usize>,

    /// Optional path to save run metrics JSON after the run completes
    #[serde(default)]
    pub metrics_output_path: Option<String>,
}

impl Config {
    /// Load configuration from a YAML or JSON file.
    /// Format is auto-detected from file extension (.yaml, .yml, or .json).
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Config = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            _ => {
                // Try YAML first (it's a superset of JSON)
                serde_yaml::from_str(&contents)?
            }
        };
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.output.dir.as_os_str().is_empty() {
            anyhow::bail!("Output directory must not be empty");
        }
        if self.output.image_width == 0 || self.output.image_height == 0 {
            anyhow::bail!("Image dimensions must be > 0");
        }
        if self.processing.rayon_threads == Some(0) {
            anyhow::bail!("Rayon threads must be > 0");
        }
        self.labels.validate()?;
        Ok(())
    }
}

// Default value functions for serde
fn default_input_path() -> PathBuf { PathBuf::from("deviation.json") }
fn default_output_dir() -> PathBuf { PathBuf::from("plots") }
fn default_image_width() -> u32 { 640 }
fn default_image_height() -> u32 { 480 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.input.path, PathBuf::from("deviation.json"));
        assert_eq!(config.output.dir, PathBuf::from("plots"));
        assert_eq!(config.output.image_width, 640);
        assert_eq!(config.labels, LabelSet::default());
        assert!(!config.processing.parallel_render);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml(
            r#"
output:
  dir: "reports/run1"
labels: [3.0, 4.0, 5.0]
"#,
        )
        .unwrap();

        assert_eq!(config.output.dir, PathBuf::from("reports/run1"));
        assert_eq!(config.output.image_height, 480);
        assert_eq!(config.input.path, PathBuf::from("deviation.json"));
        assert_eq!(config.labels.len(), 3);
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json(
            r#"{"input": {"path": "data.json"}, "processing": {"parallel_render": true}}"#,
        )
        .unwrap();
        assert_eq!(config.input.path, PathBuf::from("data.json"));
        assert!(config.processing.parallel_render);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.output.dir, config.output.dir);
        assert_eq!(parsed.labels, config.labels);
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, r#"{"output": {"dir": "out"}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("out"));
    }

    #[test]
    fn test_config_validation_invalid() {
        let mut config = Config::default();
        config.output.image_width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.labels = LabelSet::new(vec![4.0, 4.0]);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.processing.rayon_threads = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.dir = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
