//! HTTP client implementation for the Splunk REST API.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client as ReqwestClient, Response,
};
use serde::Serialize;
use tracing::debug;

use super::error::{Error, Result};

/// HTTP client for the Splunk REST API.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    port: u16,
    username: String,
    password: String,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(
        base_url: &str,
        port: u16,
        username: String,
        password: String,
        verify_tls: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_tls)
            .default_headers(default_headers())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            port,
            username,
            password,
        })
    }

    /// Returns the absolute URL for an API path.
    ///
    /// One trailing slash is stripped from the base URL before the port is
    /// appended.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{}:{}{}", base, self.port, path)
    }

    /// Posts a URL-encoded form and returns the raw response body.
    pub async fn post_form<T>(&self, path: &str, form: &T) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        debug!(%url, user = %self.username, "POST");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .form(form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handles the API response.
    async fn handle_response(&self, response: Response) -> Result<Bytes> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Error::api(status.as_u16(), &body));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "response");
        Ok(body)
    }
}

/// Returns default headers for API requests.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(USER_AGENT, HeaderValue::from_static("ephor-splunk-rust/0.1"));
    headers
}
