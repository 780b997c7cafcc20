use thiserror::Error;

/// Top-level error type shared by relgraph crates.
#[derive(Error, Debug)]
pub enum RelgraphError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("Invalid properties: {0}")]
    InvalidProperties(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for RelgraphError {
    fn from(err: config::ConfigError) -> Self {
        RelgraphError::Config(err.to_string())
    }
}
