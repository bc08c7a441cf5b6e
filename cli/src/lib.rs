//! CLI utilities for ephor.
//!
//! This crate provides config-file discovery, password masking and the
//! output sink shared by the `ephor` binary.

pub mod config;
pub mod output;
pub mod paths;

pub use config::{load_config, mask_password, ConfigError, ConfigFile};
pub use output::Output;
pub use paths::Paths;
