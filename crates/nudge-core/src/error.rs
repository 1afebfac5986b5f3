use thiserror::Error;

/// Top-level error type for the Nudge workspace.
///
/// Parsing and the capture dialogue never fail (an unparseable turn is a
/// re-prompt, not an error), so the variants here cover only the ambient
/// concerns: configuration files and serialization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NudgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for NudgeError {
    fn from(err: toml::de::Error) -> Self {
        NudgeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NudgeError {
    fn from(err: toml::ser::Error) -> Self {
        NudgeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NudgeError {
    fn from(err: serde_json::Error) -> Self {
        NudgeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Nudge operations.
pub type Result<T> = std::result::Result<T, NudgeError>;
