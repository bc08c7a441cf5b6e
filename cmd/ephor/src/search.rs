//! Runs the session's query against the export endpoint and routes the
//! response to the output sink.

use std::io::Write;

use tracing::{debug, info};

use crate::error::AppError;
use crate::session::Session;
use crate::util::print_success;

/// Message printed when there is no query to run.
pub const NO_QUERY_MESSAGE: &str = "No query provided: execution is complete.";

/// What a search run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The query was empty; nothing was sent.
    NoQuery,
    /// The response payload was written to the output sink.
    Written { bytes: usize },
}

/// Executes the current query.
///
/// Results go to the session's destination file, or to `stdout` followed by
/// a newline. An empty query prints [`NO_QUERY_MESSAGE`] and sends nothing.
pub async fn execute<W: Write>(session: &Session, stdout: &mut W) -> Result<Outcome, AppError> {
    let Some(req) = session.export_request() else {
        writeln!(stdout, "{}", NO_QUERY_MESSAGE)?;
        stdout.flush()?;
        return Ok(Outcome::NoQuery);
    };

    let client = session.client()?;
    debug!(
        query = %req.query,
        url = client.base_url(),
        port = client.port(),
        user = client.username(),
        output_mode = req.output_mode.as_str(),
        verify_tls = client.verify_tls(),
        timeout_secs = client.timeout().as_secs(),
        "running search"
    );

    let body = client.search().export(&req).await?;

    let destination = session.destination();
    destination.write(&body, stdout)?;
    if let Some(path) = &destination.file {
        print_success(&format!("Wrote {} bytes to '{}'", body.len(), path.display()));
    }
    info!(bytes = body.len(), destination = %destination.location(), "search complete");

    Ok(Outcome::Written { bytes: body.len() })
}
