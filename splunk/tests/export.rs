use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Form, Router,
};
use ephor_splunk::{Client, Error, ExportRequest, OutputMode, SEARCH_EXPORT_PATH};

/// `admin:changeme` in base64.
const ADMIN_BASIC: &str = "Basic YWRtaW46Y2hhbmdlbWU=";

#[derive(Debug, Clone)]
struct Recorded {
    authorization: Option<String>,
    params: HashMap<String, String>,
}

#[derive(Clone)]
struct MockSplunk {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockSplunk {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn export(
    State(mock): State<MockSplunk>,
    headers: HeaderMap,
    Form(params): Form<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    mock.requests.lock().unwrap().push(Recorded {
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        params,
    });
    if !mock.delay.is_zero() {
        tokio::time::sleep(mock.delay).await;
    }
    (mock.status, mock.body)
}

/// Starts the mock server and returns its port.
async fn serve(mock: MockSplunk) -> u16 {
    let app = Router::new()
        .route(SEARCH_EXPORT_PATH, post(export))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

fn client(port: u16) -> Client {
    Client::builder("http://127.0.0.1/", "admin", "changeme")
        .port(port)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_export_posts_form_with_basic_auth() {
    let mock = MockSplunk::new(StatusCode::OK, r#"{"ok":true}"#);
    let port = serve(mock.clone()).await;

    let body = client(port)
        .search()
        .export(&ExportRequest::new("index=main | head 5", OutputMode::Json))
        .await
        .unwrap();
    assert_eq!(&body[..], br#"{"ok":true}"#);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.authorization.as_deref(), Some(ADMIN_BASIC));
    assert_eq!(req.params["search"], "search index=main | head 5");
    assert_eq!(req.params["output_mode"], "json");
    assert_eq!(req.params["exec_mode"], "oneshot");
    assert_eq!(req.params.len(), 3);
}

#[tokio::test]
async fn test_export_non_success_status_is_api_error() {
    let mock = MockSplunk::new(StatusCode::UNAUTHORIZED, "login failed");
    let port = serve(mock).await;

    let err = client(port)
        .search()
        .export(&ExportRequest::new("index=main", OutputMode::Xml))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert!(matches!(err, Error::Api { http_status: 401, ref body } if body == "login failed"));
}

#[tokio::test]
async fn test_export_times_out() {
    let mut mock = MockSplunk::new(StatusCode::OK, "late");
    mock.delay = Duration::from_secs(3);
    let port = serve(mock).await;

    let client = Client::builder("http://127.0.0.1", "admin", "changeme")
        .port(port)
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let err = client
        .search()
        .export(&ExportRequest::new("index=main", OutputMode::Csv))
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_export_unreachable_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = client(port)
        .search()
        .export(&ExportRequest::new("index=main", OutputMode::Xml))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert_eq!(err.http_status(), None);
}
