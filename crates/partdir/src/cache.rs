//! Directory scan and in-memory index.
//!
//! The cache is built once by walking the library root and the category
//! directories directly below it. It is never refreshed; construct a new
//! source to pick up changes on disk.

use crate::name::{PartName, classify_entry};
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Characters never accepted in a category name.
const CATEGORY_FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Whether a directory name is acceptable as a category.
///
/// Hidden directories (leading `.`), names with path or shell
/// metacharacters, and names with control characters are rejected.
pub fn is_category_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name
            .chars()
            .any(|c| c.is_control() || CATEGORY_FORBIDDEN.contains(&c))
}

/// Categories and part names found under a library root.
#[derive(Debug, Default)]
pub struct DirCache {
    categories: BTreeSet<String>,
    part_names: BTreeSet<PartName>,
}

impl DirCache {
    /// Scan `root` and build the cache.
    ///
    /// Fails if any scanned directory cannot be read, or if two files map to
    /// the same part name. Entries that are not part files or categories are
    /// skipped.
    ///
    /// Part names are UTF-8 strings, so entries whose file names are not
    /// valid UTF-8 are skipped with a warning instead of being indexed.
    pub fn build(root: &Path, versioning: bool) -> Result<Self> {
        let mut cache = Self::default();
        cache.scan_dir(root, "", versioning)?;

        info!(
            "Cached {} categories and {} parts from {}",
            cache.categories.len(),
            cache.part_names.len(),
            root.display()
        );
        Ok(cache)
    }

    /// Scan one directory. Only the root (empty `category`) recurses, which
    /// caps the walk at two levels.
    fn scan_dir(&mut self, root: &Path, category: &str, versioning: bool) -> Result<()> {
        let dir = if category.is_empty() {
            root.to_path_buf()
        } else {
            root.join(category)
        };

        let scan_error = |source| Error::ScanDirectory {
            path: dir.clone(),
            source,
        };

        for entry in fs::read_dir(&dir).map_err(scan_error)? {
            let entry = entry.map_err(scan_error)?;
            let path = entry.path();

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                warn!("Skipping non UTF-8 entry {}", path.display());
                continue;
            };

            // follows symlinks; dangling entries are skipped
            let Ok(metadata) = fs::metadata(&path) else {
                trace!("Ignoring {} (no status)", path.display());
                continue;
            };

            if metadata.is_file()
                && let Some(part_name) = classify_entry(name, category, versioning)
            {
                if self.part_names.contains(&part_name) {
                    return Err(Error::DuplicatePart {
                        name: part_name.into_string(),
                        path,
                    });
                }
                debug!("Found part {part_name}");
                self.part_names.insert(part_name);
            } else if metadata.is_dir() && category.is_empty() && is_category_name(name) {
                debug!("Found category {name}");
                self.categories.insert(name.to_string());
                self.scan_dir(root, name, versioning)?;
            } else {
                trace!("Ignoring {}", path.display());
            }
        }

        Ok(())
    }

    /// Category names in lexicographic order.
    pub const fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Part names in revision order.
    pub const fn part_names(&self) -> &BTreeSet<PartName> {
        &self.part_names
    }

    /// Number of cached part names.
    pub fn len(&self) -> usize {
        self.part_names.len()
    }

    /// Whether no part names were found.
    pub fn is_empty(&self) -> bool {
        self.part_names.is_empty()
    }
}
