//! Config file search paths.

use std::path::{Path, PathBuf};

/// Default configuration file name, without extension.
pub const DEFAULT_CONFIG_NAME: &str = "config";

/// Recognized configuration file extensions, in lookup order.
pub const CONFIG_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Directories searched for a config file when none is given explicitly.
#[derive(Debug, Clone)]
pub struct Paths {
    /// User's home directory, searched first.
    pub home_dir: Option<PathBuf>,
    /// Working directory, searched second.
    pub work_dir: PathBuf,
}

impl Paths {
    /// Creates a Paths instance for the current user and working directory.
    pub fn new() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            work_dir: PathBuf::from("."),
        }
    }

    /// Creates a Paths instance with explicit directories.
    pub fn with_dirs(home_dir: Option<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir,
            work_dir: work_dir.into(),
        }
    }

    /// Returns the search directories in lookup order.
    pub fn search_dirs(&self) -> Vec<&Path> {
        self.home_dir
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(self.work_dir.as_path()))
            .collect()
    }

    /// Returns every candidate config file path in lookup order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.search_dirs()
            .into_iter()
            .flat_map(|dir| {
                CONFIG_EXTENSIONS
                    .iter()
                    .map(move |ext| dir.join(format!("{}.{}", DEFAULT_CONFIG_NAME, ext)))
            })
            .collect()
    }

    /// Returns the first candidate that is an existing file.
    pub fn find_config(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|p| p.is_file())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
