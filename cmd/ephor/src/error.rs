//! Application error type and exit codes.

use ephor_cli::ConfigError;
use thiserror::Error;

/// Exit code for a general runtime failure (transport, I/O).
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for missing or invalid user-supplied configuration.
pub const EXIT_USER_INPUT: u8 = 2;

/// Error type for the ephor binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required configuration missing, or the config source is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid value supplied for a session setting.
    #[error("{0}")]
    Validation(String),

    /// Network, TLS or server-side failure.
    #[error("search request failed: {0}")]
    Transport(#[from] ephor_splunk::Error),

    /// Failure writing results.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Configuration(e.to_string())
    }
}

impl AppError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Configuration(_) | AppError::Validation(_) => EXIT_USER_INPUT,
            AppError::Transport(_) | AppError::Io(_) => EXIT_FAILURE,
        }
    }
}
