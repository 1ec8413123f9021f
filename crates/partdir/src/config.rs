//! Configuration for a directory part source

use crate::VERSIONING_OPTION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a [`DirSource`](crate::DirSource)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Library root directory
    pub root: PathBuf,

    /// Index only revisioned part files (`name.part.revN`)
    ///
    /// When unset, only bare `name.part` files are indexed.
    #[serde(default)]
    pub versioning: bool,
}

impl SourceConfig {
    /// Create a new configuration for the given root, versioning off
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            versioning: false,
        }
    }

    /// Enable or disable versioned mode
    #[must_use]
    pub const fn with_versioning(mut self, enable: bool) -> Self {
        self.versioning = enable;
        self
    }

    /// Apply a free-form options string
    ///
    /// Versioned mode is enabled when the string contains `useVersioning`
    /// anywhere. No other token is recognized.
    #[must_use]
    pub fn with_options(mut self, options: &str) -> Self {
        self.versioning = Self::options_enable_versioning(options);
        self
    }

    /// Whether an options string asks for versioned mode
    pub fn options_enable_versioning(options: &str) -> bool {
        options.contains(VERSIONING_OPTION)
    }
}
