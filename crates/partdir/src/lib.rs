//! Directory-backed part library.
//!
//! A part is a named, optionally revisioned text record stored as one file
//! below a library root. Parts may be grouped into categories, which are the
//! first-level subdirectories of the root:
//!
//! ```text
//! <root>/<basename>.part                      -> "basename"
//! <root>/<category>/<basename>.part           -> "category/basename"
//! <root>/<category>/<basename>.part.rev<N>    -> "category/basename/revN"
//! ```
//!
//! The whole tree is scanned once when a [`DirSource`] is constructed.
//! Queries run against that in-memory index; part payloads are read from
//! disk on demand and returned unparsed.
//!
//! # Example
//!
//! ```no_run
//! use partdir::{DirSource, PartSource};
//!
//! # fn example() -> partdir::Result<()> {
//! let source = DirSource::new("/path/to/library", "useVersioning")?;
//!
//! for category in source.categories() {
//!     for name in source.categorical_part_names(&category) {
//!         let payload = source.read_part(name.as_str(), None)?;
//!         println!("{name}: {} bytes", payload.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Directory scan and in-memory index
pub mod cache;

// Source configuration
pub mod config;

// Error types
pub mod error;

// Part name <-> file name codec
pub mod name;

// Revision-aware ordering of part names
pub mod ordering;

// Query surface
pub mod source;

pub use cache::{DirCache, is_category_name};
pub use config::SourceConfig;
pub use error::{Error, Result};
pub use name::{PartName, build_file_path, classify_entry, rev_suffix};
pub use ordering::compare_by_rev;
pub use source::{DirSource, PartSource};

/// Version information for the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Infix that marks a part file: `<basename>.part[.revN]`.
pub const PART_EXTENSION: &str = ".part";

/// Literal that introduces a revision number.
pub const REV_PREFIX: &str = "rev";

/// Separator between segments of a part name.
pub const NAME_SEPARATOR: u8 = b'/';

/// Separator between `.part` and the revision in a file name.
pub const FILE_SEPARATOR: u8 = b'.';

/// Option token that enables versioned mode.
pub const VERSIONING_OPTION: &str = "useVersioning";

/// Largest part payload that will be read, in bytes (1 MiB).
pub const MAX_PART_SIZE: u64 = 1024 * 1024;

/// Source type reported by [`DirSource`].
pub const DIR_SOURCE_TYPE: &str = "dir";
