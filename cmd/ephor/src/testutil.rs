//! Test helpers: session fixtures and a local stand-in for the search API.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Form, Router};
use ephor_splunk::SEARCH_EXPORT_PATH;

use crate::session::{merge, Overrides, Session};

/// Overrides for user `admin` / `changeme` against `url`.
pub fn overrides(url: &str) -> Overrides {
    Overrides {
        username: Some("admin".to_string()),
        password: Some("changeme".to_string()),
        url: Some(url.to_string()),
        ..Default::default()
    }
}

/// A session pointing at `http://127.0.0.1:{port}`.
///
/// The port is not recorded as an override, so a config reload may change it.
pub fn local_session(port: u16, interactive: bool) -> Session {
    let over = overrides("http://127.0.0.1");
    let mut settings = merge(None, &over).unwrap();
    settings.port = Some(port);
    Session::new(settings, over, interactive)
}

/// Writes `config.yaml` into `dir` and returns its path.
pub fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

/// Form parameters received by the mock server.
pub type Received = Arc<Mutex<Vec<HashMap<String, String>>>>;

#[derive(Clone)]
struct Mock {
    status: StatusCode,
    body: &'static str,
    received: Received,
}

async fn export(
    State(mock): State<Mock>,
    Form(params): Form<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    mock.received.lock().unwrap().push(params);
    (mock.status, mock.body)
}

/// Starts a mock export endpoint answering every request with `status` and
/// `body`. Returns the port and the log of received forms.
pub async fn spawn_splunk(status: StatusCode, body: &'static str) -> (u16, Received) {
    let received = Received::default();
    let app = Router::new()
        .route(SEARCH_EXPORT_PATH, post(export))
        .with_state(Mock {
            status,
            body,
            received: received.clone(),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (port, received)
}

/// Returns a port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
