//! Shared types for the Splunk search API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==================== Output Mode ====================

/// Response payload format requested from the server.
///
/// Parsing is case-insensitive; the wire token is always lower case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// XML (server default).
    #[default]
    Xml,
    /// JSON.
    Json,
    /// CSV.
    Csv,
}

impl OutputMode {
    /// All accepted output modes.
    pub const ALL: [OutputMode; 3] = [OutputMode::Xml, OutputMode::Json, OutputMode::Csv];

    /// Returns the `output_mode` token sent to the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Xml => "xml",
            OutputMode::Json => "json",
            OutputMode::Csv => "csv",
        }
    }

    /// Returns the upper-case display name (`XML`, `JSON`, `CSV`).
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputMode::Xml => "XML",
            OutputMode::Json => "JSON",
            OutputMode::Csv => "CSV",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when an output mode token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("output format ('{0}') is invalid; valid values are XML (default), JSON, and CSV")]
pub struct ParseOutputModeError(pub String);

impl FromStr for OutputMode {
    type Err = ParseOutputModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOutputModeError(s.to_string()))
    }
}
