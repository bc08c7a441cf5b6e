//! Error types for the Splunk search client.

use thiserror::Error;

/// Result type alias for Splunk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Splunk API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP status returned by the server.
    #[error("splunk: http status {http_status}: {body}")]
    Api { http_status: u16, body: String },

    /// HTTP request error (connect, TLS, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new API error from a status code and raw response body.
    pub fn api(http_status: u16, body: &[u8]) -> Self {
        Error::Api {
            http_status,
            body: String::from_utf8_lossy(body).trim().to_string(),
        }
    }

    /// Returns the HTTP status, if the server answered.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Api { http_status, .. } => Some(*http_status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.http_status(), Some(401) | Some(403))
    }

    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns true if the server could not be reached at all.
    pub fn is_connect(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect(),
            _ => false,
        }
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.http_status(), Some(s) if s >= 500)
    }
}
