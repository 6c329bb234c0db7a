// Error type shared by the library and the binary
use std::path::PathBuf;

/// Errors that can occur while counting splice-in support.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("malformed region at {path}:{line}: {reason}")]
    Region {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid interval {chrom}:{start}-{end} (start must be < end)")]
    Interval { chrom: String, start: u64, end: u64 },

    #[error("alignment error: {0}")]
    Alignment(String),

    #[error("alignment source error: {0}")]
    Htslib(#[from] rust_htslib::errors::Error),
}

impl Error {
    /// Wraps an `io::Error` with the path it occurred on.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
