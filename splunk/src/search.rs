//! Search export service.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use super::{error::Result, http::HttpClient, types::OutputMode};

/// Streaming search export endpoint.
pub const SEARCH_EXPORT_PATH: &str = "/services/search/jobs/export";

/// Execution mode sent with every export: run the search to completion in
/// a single call.
pub const EXEC_MODE_ONESHOT: &str = "oneshot";

/// Search export service.
pub struct SearchService {
    http: Arc<HttpClient>,
}

impl SearchService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Runs a search through the export endpoint and returns the raw
    /// response payload in the requested output mode.
    pub async fn export(&self, req: &ExportRequest) -> Result<Bytes> {
        let form = req.form();
        debug!(query = %req.query, output_mode = req.output_mode.as_str(), "search export");
        self.http.post_form(SEARCH_EXPORT_PATH, &form).await
    }
}

/// Search export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Search expression without the leading `search` command.
    pub query: String,
    /// Requested payload format.
    pub output_mode: OutputMode,
}

/// Form body posted to the export endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportForm {
    pub search: String,
    pub output_mode: &'static str,
    pub exec_mode: &'static str,
}

impl ExportRequest {
    /// Creates a new export request.
    pub fn new(query: impl Into<String>, output_mode: OutputMode) -> Self {
        Self {
            query: query.into(),
            output_mode,
        }
    }

    /// Returns the form parameters.
    ///
    /// The search language requires a leading command, so the raw query is
    /// prefixed with `search ` verbatim.
    pub fn form(&self) -> ExportForm {
        ExportForm {
            search: format!("search {}", self.query),
            output_mode: self.output_mode.as_str(),
            exec_mode: EXEC_MODE_ONESHOT,
        }
    }
}
