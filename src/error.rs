//! Error types for citation parsing, rendering and filing operations.
//!
//! Every failure carries the path it concerns where one exists, so a batch
//! run can log the offending file and move on to the next one.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CitationError>;

/// Top-level error type for citation operations.
#[derive(Error, Debug)]
pub enum CitationError {
    /// A citation file could not be opened or decoded as UTF-8.
    #[error("Unable to read citation file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The requested style name is not one of the supported styles.
    #[error(
        "Unsupported citation style \"{0}\" (expected one of: APA, MLA 9, ACS, Chicago, ASA, Elsevier, IEEE, Nature)"
    )]
    UnsupportedStyle(String),

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// No usable directory was selected for the named role.
    #[error("No {0} directory selected")]
    MissingDirectory(&'static str),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Spreadsheet(#[from] csv::Error),

    #[error("Unable to write store {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A record could not be serialized for output.
    #[error("Unable to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl CitationError {
    /// Create a `FileAccess` error for a citation file.
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create an `Io` error for any other filesystem operation.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
