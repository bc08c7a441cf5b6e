//! Splunk search API client.

use std::sync::Arc;
use std::time::Duration;

use super::{
    error::{Error, Result},
    http::HttpClient,
    search::SearchService,
};

/// Default Splunk management port.
pub const DEFAULT_PORT: u16 = 8089;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Splunk search API client.
///
/// # Example
///
/// ```rust,no_run
/// use ephor_splunk::{Client, ExportRequest, OutputMode};
///
/// # async fn run() -> ephor_splunk::Result<()> {
/// let client = Client::builder("https://splunk.example.com", "admin", "changeme")
///     .port(8089)
///     .build()?;
///
/// let body = client
///     .search()
///     .export(&ExportRequest::new("index=main", OutputMode::Json))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone)]
struct ClientConfig {
    base_url: String,
    port: u16,
    username: String,
    verify_tls: bool,
    timeout: Duration,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientBuilder {
        ClientBuilder::new(base_url, username, password)
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the configured port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Returns the configured username.
    pub fn username(&self) -> &str {
        &self.config.username
    }

    /// Returns whether server certificates are verified.
    pub fn verify_tls(&self) -> bool {
        self.config.verify_tls
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Returns the search service.
    pub fn search(&self) -> SearchService {
        SearchService::new(self.http.clone())
    }
}

/// Builder for creating a Splunk search client.
pub struct ClientBuilder {
    base_url: String,
    port: u16,
    username: String,
    password: String,
    verify_tls: bool,
    timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new client builder.
    ///
    /// Certificate verification starts disabled so self-signed management
    /// ports work out of the box; see [`ClientBuilder::verify_tls`].
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: password.into(),
            verify_tls: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the management port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables or disables server certificate verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url must be non-empty".to_string()));
        }
        if self.username.is_empty() {
            return Err(Error::Config("username must be non-empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("password must be non-empty".to_string()));
        }

        let http = HttpClient::new(
            &self.base_url,
            self.port,
            self.username.clone(),
            self.password,
            self.verify_tls,
            self.timeout,
        )?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                base_url: self.base_url,
                port: self.port,
                username: self.username,
                verify_tls: self.verify_tls,
                timeout: self.timeout,
            },
        })
    }
}
