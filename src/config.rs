// src/config.rs

//! Configuration for the `pixelflow-simd` diagnostic driver.
//!
//! The build tier is fixed at compile time and is never configurable; these
//! settings only control what the driver reports and how strict it is about
//! a CPU that is older than the build tier.
//!
//! The configuration is read from the JSON file named by the
//! `PIXELFLOW_SIMD_CONFIG` environment variable. Without it, defaults apply.
//! Missing fields take their defaults as well.

use crate::error::SimdError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "PIXELFLOW_SIMD_CONFIG";

// --- Top-Level Configuration Structure ---

/// Complete driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Report output settings.
    pub report: ReportConfig,
    /// Demo vector printout settings.
    pub demo: DemoConfig,
    /// Fail instead of warning when the CPU tier is below the build tier.
    pub strict: bool,
}

// --- Report Configuration ---

/// Output format of the tier report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// Settings for the tier report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format.
    pub format: ReportFormat,
    /// Include the individual CPU feature flags.
    pub show_cpu_features: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            format: ReportFormat::Text,
            show_cpu_features: true,
        }
    }
}

// --- Demo Configuration ---

/// Settings for the demo vector printout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Print sample vectors and their arithmetic for every available type.
    pub enabled: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig { enabled: true }
    }
}

// --- Loading ---

impl Config {
    /// Parses a JSON configuration document.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, SimdError> {
        serde_json::from_str(text).map_err(|source| SimdError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, SimdError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimdError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text, path)?;
        debug!("Parsed config: {:?}", config);
        Ok(config)
    }

    /// Loads the file named by [`CONFIG_ENV`], or defaults when it is unset.
    pub fn load() -> Result<Self, SimdError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading config from {}", path.display());
                Self::from_path(&path)
            }
            None => {
                info!("{} not set, using default config", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = Config::from_json(r#"{ "report": { "format": "json" } }"#, Path::new("t.json"))
            .unwrap();
        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(config.report.show_cpu_features);
        assert!(config.demo.enabled);
        assert!(!config.strict);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = Config::from_json("{}", Path::new("t.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let err = Config::from_json(r#"{ "strict": "yes" }"#, Path::new("bad.json")).unwrap_err();
        match err {
            SimdError::Config { path, .. } => assert_eq!(path, PathBuf::from("bad.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let err = Config::from_path(Path::new("/nonexistent/pixelflow-simd.json")).unwrap_err();
        assert!(matches!(err, SimdError::ConfigRead { .. }));
    }

    #[test_log::test]
    fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join(format!("pixelflow-simd-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "demo": { "enabled": false }, "strict": true }"#).unwrap();
        let config = Config::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(!config.demo.enabled);
        assert!(config.strict);
    }
}
