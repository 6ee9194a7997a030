use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
///
/// Configuration errors are fatal at bootstrap time and abort startup.
/// Everything else surfaces at the error-handling interceptor boundary
/// and is mapped to an HTTP response there.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A module, provider or controller is wired incorrectly.
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] crate::lifecycle::LifecycleError),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Internal(format!("JSON error: {}", err))
    }
}
