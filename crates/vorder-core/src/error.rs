use thiserror::Error;

/// Top-level error type for the vorder system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for VorderError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VorderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VorderError {
    fn from(err: toml::de::Error) -> Self {
        VorderError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VorderError {
    fn from(err: toml::ser::Error) -> Self {
        VorderError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VorderError {
    fn from(err: serde_json::Error) -> Self {
        VorderError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for vorder operations.
pub type Result<T> = std::result::Result<T, VorderError>;
