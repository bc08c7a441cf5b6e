//! Splunk search-export SDK for Rust.
//!
//! This crate provides a client for the `/services/search/jobs/export`
//! REST endpoint of a Splunk instance.

mod client;
mod error;
pub mod http;
mod search;
mod types;

pub use client::{Client, ClientBuilder, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use search::{ExportForm, ExportRequest, SearchService, EXEC_MODE_ONESHOT, SEARCH_EXPORT_PATH};
pub use types::{OutputMode, ParseOutputModeError};
