//! Configuration file loading.
//!
//! A config file is a flat YAML or JSON mapping:
//!
//! ```yaml
//! url: https://splunk.example.com
//! username: admin
//! password: changeme
//! port: 8089
//! output: json
//! verify_tls: false
//! timeout: 30
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

use crate::paths::Paths;

/// Number of password characters revealed by [`mask_password`].
pub const PASSWORD_REVEAL: usize = 4;

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Values read from a config file.
///
/// Every key is optional. Text keys take YAML scalars exactly as written, so
/// an unquoted `password: 007` stays `"007"`. JSON text keys must be strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Server base URL (scheme and host).
    #[serde(default)]
    pub url: Option<String>,

    /// Port as written, either an integer or a string.
    #[serde(default, deserialize_with = "port_token")]
    pub port: Option<String>,

    /// Output format token (xml, json, csv).
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub verify_tls: Option<bool>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged, expecting = "a port number or string")]
enum PortToken {
    Int(i64),
    Text(String),
}

fn port_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PortToken>::deserialize(deserializer)?.map(|v| match v {
        PortToken::Int(n) => n.to_string(),
        PortToken::Text(s) => s,
    }))
}

/// Loads the config file.
///
/// With an explicit path the file must exist and parse. Without one, the
/// default search locations are tried and `Ok(None)` is returned when none
/// of them holds a config file.
pub fn load_config(custom_path: Option<&Path>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = match custom_path {
        Some(p) => p.to_path_buf(),
        None => match Paths::new().find_config() {
            Some(p) => p,
            None => {
                debug!("no config file found in default locations");
                return Ok(None);
            }
        },
    };

    let data = fs::read(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let cfg = parse_config(&data, &path)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(Some(cfg))
}

/// Parses config data based on the file extension, falling back to YAML
/// then JSON for unknown extensions.
pub fn parse_config(data: &[u8], path: &Path) -> Result<ConfigFile, ConfigError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    // An empty document is an empty mapping.
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConfigFile::default());
    }

    match ext.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_slice(data).map_err(|e| parse_err(e.to_string())),
        Some("json") => serde_json::from_slice(data).map_err(|e| parse_err(e.to_string())),
        _ => {
            if let Ok(v) = serde_yaml::from_slice(data) {
                return Ok(v);
            }
            serde_json::from_slice(data)
                .map_err(|_| parse_err("unrecognized format (tried YAML and JSON)".to_string()))
        }
    }
}

/// Masks a password for display.
///
/// The first four characters are shown and every remaining character is
/// replaced by `*`. Passwords shorter than four characters are masked
/// entirely.
pub fn mask_password(password: &str) -> String {
    let len = password.chars().count();
    if len < PASSWORD_REVEAL {
        return "*".repeat(len);
    }
    let prefix: String = password.chars().take(PASSWORD_REVEAL).collect();
    format!("{}{}", prefix, "*".repeat(len - PASSWORD_REVEAL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "url: https://splunk.local\nusername: admin\npassword: changeme\nport: 9089\noutput: JSON"
        )
        .unwrap();

        let cfg = load_config(Some(file.path())).unwrap().unwrap();
        assert_eq!(cfg.url.as_deref(), Some("https://splunk.local"));
        assert_eq!(cfg.username.as_deref(), Some("admin"));
        assert_eq!(cfg.password.as_deref(), Some("changeme"));
        assert_eq!(cfg.port.as_deref(), Some("9089"));
        assert_eq!(cfg.output.as_deref(), Some("JSON"));
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(
            file,
            r#"{{"url": "https://splunk.local", "username": "admin", "port": "8089", "verify_tls": true, "timeout": 5}}"#
        )
        .unwrap();

        let cfg = load_config(Some(file.path())).unwrap().unwrap();
        assert_eq!(cfg.url.as_deref(), Some("https://splunk.local"));
        assert_eq!(cfg.password, None);
        assert_eq!(cfg.port.as_deref(), Some("8089"));
        assert_eq!(cfg.verify_tls, Some(true));
        assert_eq!(cfg.timeout, Some(5));
    }

    #[test]
    fn test_yaml_scalars_keep_their_text() {
        let cfg = parse_config(b"password: 007\nusername: 1.10\nurl: true\n", Path::new("config.yml")).unwrap();
        assert_eq!(cfg.password.as_deref(), Some("007"));
        assert_eq!(cfg.username.as_deref(), Some("1.10"));
        assert_eq!(cfg.url.as_deref(), Some("true"));

        let cfg = parse_config(b"password: '007'\n", Path::new("config")).unwrap();
        assert_eq!(cfg.password.as_deref(), Some("007"));
    }

    #[test]
    fn test_json_numeric_credentials_are_rejected() {
        let err = parse_config(br#"{"password": 7}"#, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("expected a string"), "{}", err);
    }

    #[test]
    fn test_port_accepts_number_or_string() {
        let cfg = parse_config(b"port: 9089\n", Path::new("config.yaml")).unwrap();
        assert_eq!(cfg.port.as_deref(), Some("9089"));
        let cfg = parse_config(br#"{"port": "8089"}"#, Path::new("config.json")).unwrap();
        assert_eq!(cfg.port.as_deref(), Some("8089"));
        assert!(parse_config(b"port: [1]\n", Path::new("config.yaml")).is_err());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let cfg = parse_config(b"username: admin\nindex: main\n", Path::new("config")).unwrap();
        assert_eq!(cfg.username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_empty_file() {
        let cfg = parse_config(b"\n", Path::new("config.yaml")).unwrap();
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badpath.yaml");
        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("badpath.yaml"));
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_config(b"{{{{ not a config", Path::new("config.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let err = parse_config(b"url: [unclosed", Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_mask_password() {
        assert_eq!(mask_password("changeme"), "chan****");
        assert_eq!(mask_password("abcd"), "abcd");
        assert_eq!(mask_password("abc"), "***");
        assert_eq!(mask_password(""), "");
        assert_eq!(mask_password("pässwört"), "päss****");
    }

    #[test]
    fn test_mask_password_length_law() {
        for len in 0..20 {
            let pw: String = "x".repeat(len);
            let masked = mask_password(&pw);
            assert_eq!(masked.chars().count(), len);
            let stars = masked.chars().filter(|c| *c == '*').count();
            if len >= PASSWORD_REVEAL {
                assert_eq!(stars, len - PASSWORD_REVEAL);
                assert!(masked.starts_with("xxxx"));
            } else {
                assert_eq!(stars, len);
            }
        }
    }
}
