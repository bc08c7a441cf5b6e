//! Session state and configuration merging.
//!
//! A [`Session`] is built once from the config file and command-line
//! overrides, then read by the search orchestrator and mutated by the
//! interactive console.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ephor_cli::{load_config, mask_password, ConfigFile, Output};
use ephor_splunk::{Client, ExportRequest, OutputMode, DEFAULT_PORT, DEFAULT_TIMEOUT};
use tracing::debug;

use crate::error::AppError;
use crate::util::print_warning;

/// Values supplied explicitly on the command line.
///
/// These win over the config file at startup. On reload only the
/// credentials and URL keep precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub port: Option<String>,
    pub output: Option<String>,
    pub verify_tls: Option<bool>,
    pub timeout: Option<u64>,
}

impl Overrides {
    /// Keeps only the username, password and URL.
    fn credentials(&self) -> Overrides {
        Overrides {
            username: self.username.clone(),
            password: self.password.clone(),
            url: self.url.clone(),
            ..Default::default()
        }
    }
}

/// Result of merging the config file with the overrides.
///
/// Optional fields are `None` when neither source specified a usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub username: String,
    pub password: String,
    pub address: String,
    pub port: Option<u16>,
    pub output: Option<OutputMode>,
    pub verify_tls: Option<bool>,
    pub timeout: Option<Duration>,
}

/// Merges a config file with command-line overrides.
///
/// A non-empty override wins, then the file value, then empty. Fails when
/// the username, password or URL end up empty, or when the port or timeout
/// is out of range. An unrecognized output format only warns.
pub fn merge(file: Option<&ConfigFile>, overrides: &Overrides) -> Result<Settings, AppError> {
    let pick = |over: &Option<String>, from_file: Option<&Option<String>>| -> Option<String> {
        over.clone()
            .filter(|v| !v.is_empty())
            .or_else(|| from_file.and_then(|v| v.clone()))
    };

    let username = pick(&overrides.username, file.map(|f| &f.username)).unwrap_or_default();
    let password = pick(&overrides.password, file.map(|f| &f.password)).unwrap_or_default();
    let address = pick(&overrides.url, file.map(|f| &f.url)).unwrap_or_default();

    let missing: Vec<&str> = [("username", &username), ("password", &password), ("url", &address)]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Configuration(format!(
            "one or more pieces of required configuration information were not provided: {}",
            missing.join(", ")
        )));
    }

    let port = match pick(&overrides.port, file.map(|f| &f.port)) {
        Some(token) => Some(parse_port(&token).ok_or_else(|| {
            AppError::Configuration(format!("the provided port '{}' is not valid", token))
        })?),
        None => None,
    };

    let output = match pick(&overrides.output, file.map(|f| &f.output)) {
        Some(token) => match token.parse::<OutputMode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                print_warning(&e.to_string());
                None
            }
        },
        None => None,
    };

    let verify_tls = overrides.verify_tls.or_else(|| file.and_then(|f| f.verify_tls));
    let timeout = match overrides.timeout.or_else(|| file.and_then(|f| f.timeout)) {
        Some(0) => {
            return Err(AppError::Configuration(
                "the provided timeout '0' is not valid: it must be at least one second".to_string(),
            ));
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    Ok(Settings {
        username,
        password,
        address,
        port,
        output,
        verify_tls,
        timeout,
    })
}

/// Parses a port token; `0` and non-numeric tokens are rejected.
pub fn parse_port(token: &str) -> Option<u16> {
    token.parse::<u16>().ok().filter(|p| *p != 0)
}

/// Connection and output state for the current run.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    address: String,
    port: u16,
    username: String,
    password: String,
    output: OutputMode,
    destination: Output,
    query: String,
    interactive: bool,
    verify_tls: bool,
    timeout: Duration,
    overrides: Overrides,
}

impl Session {
    /// Builds the session from the config file and the overrides.
    ///
    /// With `config` set that file must be readable; otherwise the default
    /// locations are searched and a missing file is not an error.
    pub fn from_sources(
        config: Option<&Path>,
        overrides: Overrides,
        interactive: bool,
    ) -> Result<Self, AppError> {
        let file = load_config(config)?;
        let settings = merge(file.as_ref(), &overrides)?;
        Ok(Self::new(settings, overrides, interactive))
    }

    /// Builds the session from merged settings, filling in defaults.
    pub fn new(settings: Settings, overrides: Overrides, interactive: bool) -> Self {
        Self {
            address: settings.address,
            port: settings.port.unwrap_or(DEFAULT_PORT),
            username: settings.username,
            password: settings.password,
            output: settings.output.unwrap_or_default(),
            destination: Output::default(),
            query: String::new(),
            interactive,
            verify_tls: settings.verify_tls.unwrap_or(false),
            timeout: settings.timeout.unwrap_or(DEFAULT_TIMEOUT),
            overrides,
        }
    }

    /// Re-reads connection settings from `path`.
    ///
    /// Command-line credentials and URL keep precedence. Port, output, TLS
    /// and timeout change only when the new file sets them, so values set
    /// in the console survive. On error the session is left untouched.
    pub fn reload(&mut self, path: &Path) -> Result<(), AppError> {
        let file = load_config(Some(path))?;
        let settings = merge(file.as_ref(), &self.overrides.credentials())?;

        self.username = settings.username;
        self.password = settings.password;
        self.address = settings.address;
        if let Some(port) = settings.port {
            self.port = port;
        }
        if let Some(output) = settings.output {
            self.output = output;
        }
        if let Some(verify) = settings.verify_tls {
            self.verify_tls = verify;
        }
        if let Some(timeout) = settings.timeout {
            self.timeout = timeout;
        }
        debug!(path = %path.display(), "session reloaded");
        Ok(())
    }

    /// Sets the port from a user token.
    pub fn set_port(&mut self, token: &str) -> Result<u16, AppError> {
        let port = parse_port(token).ok_or_else(|| {
            AppError::Validation(format!(
                "The provided port '{}' is not valid. Keeping previous value of {}.",
                token, self.port
            ))
        })?;
        self.port = port;
        Ok(port)
    }

    /// Sets the output format from a user token.
    pub fn set_output(&mut self, token: &str) -> Result<OutputMode, AppError> {
        let mode = token
            .parse::<OutputMode>()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.output = mode;
        Ok(mode)
    }

    /// Sends results to `path` instead of standard output.
    pub fn set_destination(&mut self, path: PathBuf) {
        self.destination = Output::new(Some(path));
    }

    /// Sets the query for the next search.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }

    pub fn destination(&self) -> &Output {
        &self.destination
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the request for the current query, or `None` when there is
    /// nothing to search for.
    pub fn export_request(&self) -> Option<ExportRequest> {
        if self.query.is_empty() {
            return None;
        }
        Some(ExportRequest::new(self.query.clone(), self.output))
    }

    /// Creates a search client for the current connection settings.
    pub fn client(&self) -> ephor_splunk::Result<Client> {
        Client::builder(&self.address, &self.username, &self.password)
            .port(self.port)
            .verify_tls(self.verify_tls)
            .timeout(self.timeout)
            .build()
    }

    /// Renders the status report with the password masked.
    pub fn status(&self) -> String {
        format!(
            "User Info:\n Username: {}\n Password: {}\nInstance Info:\n URL: {}\n Port: {}\nOutput Info:\n Output Type: {}\n Output Location: {}\n",
            self.username,
            mask_password(&self.password),
            self.address,
            self.port,
            self.output,
            self.destination.location(),
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &mask_password(&self.password))
            .field("output", &self.output)
            .field("destination", &self.destination)
            .field("query", &self.query)
            .field("interactive", &self.interactive)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
