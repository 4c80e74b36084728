use crate::level::FeatureLevel;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimdError {
    #[error("Unknown feature level: {0:?}")]
    UnknownLevel(String),
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("CPU supports {detected} but the crate was built for {compiled}")]
    TierMismatch {
        compiled: FeatureLevel,
        detected: FeatureLevel,
    },
    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
