//! Output sink for search results.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Label used for standard output in status displays.
pub const TERMINAL: &str = "Terminal";

/// Where result payloads are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub file: Option<PathBuf>,
}

impl Output {
    /// Creates a new output configuration.
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    /// Writes a payload.
    ///
    /// With a file set the payload replaces the file content verbatim;
    /// otherwise it goes to `stdout` followed by a newline.
    pub fn write<W: Write>(&self, data: &[u8], stdout: &mut W) -> io::Result<()> {
        match &self.file {
            Some(path) => write_file(path, data),
            None => {
                stdout.write_all(data)?;
                stdout.write_all(b"\n")?;
                stdout.flush()
            }
        }
    }

    /// Returns the display label of the destination.
    pub fn location(&self) -> String {
        match &self.file {
            Some(path) => path.display().to_string(),
            None => TERMINAL.to_string(),
        }
    }
}

/// Writes binary data to a file, truncating it (mode 0644 on unix).
pub fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o644);
    }
    let mut file = opts.open(path)?;
    file.write_all(data)?;
    file.flush()
}
