//! Top-level error types for Musebot.

use std::sync::Arc;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error enum wrapping domain-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config from {path}: {source}")]
    Load {
        path: String,
        source: Arc<std::io::Error>,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing required config key: {0}")]
    MissingKey(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Chat completion backend errors.
///
/// These are per-attempt failures: the orchestrator logs them and fails over
/// to the next backend URL rather than surfacing them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("backend request failed: {0}")]
    Request(String),

    #[error("failed to decode backend response: {0}")]
    Decode(String),

    #[error("backend response carried no choices")]
    EmptyChoices,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Image generation and processing errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image request failed: {0}")]
    Request(String),

    #[error("failed to decode image response: {0}")]
    Decode(String),

    #[error("image job did not complete: {0}")]
    JobFailed(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Rejection for a choice value outside a closed enumeration.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} variant: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
