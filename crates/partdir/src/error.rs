//! Error types for part library operations.
//!
//! Every failure is a repository I/O error carrying a readable message.
//! Nothing is retried: the operation in progress is aborted.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for part library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building the cache or reading parts.
#[derive(Debug, Error)]
pub enum Error {
    /// The repository root path was empty.
    #[error("directory path cannot be empty")]
    EmptyRootPath,

    /// A directory could not be opened or iterated during the cache build.
    #[error("{source}; scanning directory {}", path.display())]
    ScanDirectory {
        /// Directory being scanned
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Two files map onto the same logical part name.
    #[error("{name} has already been encountered (at {})", path.display())]
    DuplicatePart {
        /// Colliding part name
        name: String,
        /// File that produced the second occurrence
        path: PathBuf,
    },

    /// The requested part name is not in the cache.
    #[error("{0} not found")]
    PartNotFound(String),

    /// A part file could not be opened.
    #[error("{source}; cannot open file {}", path.display())]
    OpenPart {
        /// Part file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A part file could not be read after opening.
    #[error("{source}; cannot read file {}", path.display())]
    ReadPart {
        /// Part file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A part file is larger than the payload limit.
    #[error("{} seems too big ({size} bytes > {max} bytes)", path.display())]
    PartTooLarge {
        /// Part file path
        path: PathBuf,
        /// Size reported by the filesystem
        size: u64,
        /// Payload limit
        max: u64,
    },

    /// Fewer bytes were read than the filesystem reported.
    #[error("cannot read file {}: expected {expected} bytes, got {actual}", path.display())]
    ShortRead {
        /// Part file path
        path: PathBuf,
        /// Size reported by the filesystem
        expected: u64,
        /// Bytes actually read
        actual: u64,
    },
}

impl Error {
    /// Whether this error means the part name was not in the cache.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::PartNotFound(_))
    }
}
