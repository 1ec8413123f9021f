//! Part sources and the directory-backed implementation.

use crate::cache::DirCache;
use crate::name::{PartName, build_file_path};
use crate::{DIR_SOURCE_TYPE, Error, MAX_PART_SIZE, NAME_SEPARATOR, Result, SourceConfig};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Query surface shared by part sources.
///
/// Part payloads are returned as raw bytes and never interpreted.
pub trait PartSource {
    /// Kind of source, e.g. `"dir"`.
    fn source_type(&self) -> &'static str;

    /// Location the source was opened from.
    fn source_uri(&self) -> String;

    /// All categories, sorted.
    fn categories(&self) -> Vec<String>;

    /// Part names in `category`, or every part name when `category` is
    /// empty, in revision order.
    fn categorical_part_names(&self, category: &str) -> Vec<PartName>;

    /// Read one part.
    ///
    /// `revision` (e.g. `rev2`) is appended to `part_name` as a final
    /// `/revN` segment for the cache lookup. The file read is always the one
    /// named by `part_name` itself.
    fn read_part(&self, part_name: &str, revision: Option<&str>) -> Result<Vec<u8>>;

    /// Read several parts in order. The first failure aborts the batch.
    fn read_parts(&self, part_names: &[PartName]) -> Result<Vec<Vec<u8>>> {
        part_names
            .iter()
            .map(|name| self.read_part(name.as_str(), None))
            .collect()
    }
}

/// A part library stored in a directory tree.
///
/// ```text
/// <root>/<basename>.part[.revN]
/// <root>/<category>/<basename>.part[.revN]
/// ```
///
/// The tree is scanned once in the constructor. Reads allocate a buffer per
/// call, so a shared `&DirSource` may be used from several threads.
#[derive(Debug)]
pub struct DirSource {
    root: PathBuf,
    versioning: bool,
    cache: DirCache,
}

impl DirSource {
    /// Open a library, enabling versioned mode if `options` contains
    /// `useVersioning`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is empty, a directory cannot be scanned,
    /// or two files map to the same part name.
    pub fn new(root: impl AsRef<Path>, options: &str) -> Result<Self> {
        Self::open(SourceConfig::new(root).with_options(options))
    }

    /// Open a library from a configuration.
    pub fn open(config: SourceConfig) -> Result<Self> {
        if config.root.as_os_str().is_empty() {
            return Err(Error::EmptyRootPath);
        }

        let root = normalize_root(&config.root);

        debug!(
            "Opening part library at {} (versioning: {})",
            root.display(),
            config.versioning
        );
        let cache = DirCache::build(&root, config.versioning)?;

        Ok(Self {
            root,
            versioning: config.versioning,
            cache,
        })
    }

    /// Library root with trailing separators removed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether only revisioned part files are indexed.
    pub const fn is_versioned(&self) -> bool {
        self.versioning
    }

    /// The underlying index.
    pub const fn cache(&self) -> &DirCache {
        &self.cache
    }

    /// Every cached name sharing `part_name`'s root, newest revision first.
    ///
    /// Any revision on `part_name` itself is ignored, so `res` and
    /// `res/rev1` both list all revisions of `res`.
    pub fn revisions(&self, part_name: &str) -> Vec<PartName> {
        let wanted = PartName::new(part_name);
        let root = wanted.root();

        // The bare root is the smallest name of its group. A root that itself
        // ends in "/revN" seeks into the group of its own prefix, which sorts
        // entirely before it, so skip that remainder first.
        self.cache
            .part_names()
            .range(PartName::new(root)..)
            .skip_while(|name| name.root().as_bytes() < root.as_bytes())
            .take_while(|name| name.root() == root)
            .cloned()
            .collect()
    }

    /// Read one revision of a part from the file the cache holds for it.
    ///
    /// Unlike [`PartSource::read_part`], the path is built from the cached
    /// name, so `read_revision("a", "rev2")` reads `a.part.rev2` and an
    /// equivalent spelling such as `rev02` resolves to the file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not cached or the file cannot be
    /// read in full.
    pub fn read_revision(&self, part_name: &str, revision: &str) -> Result<Vec<u8>> {
        let name = self.lookup(&PartName::with_revision(part_name, revision))?;
        Self::read_file(&build_file_path(&self.root, name))
    }

    fn lookup(&self, key: &PartName) -> Result<&PartName> {
        self.cache
            .part_names()
            .get(key)
            .ok_or_else(|| Error::PartNotFound(key.to_string()))
    }

    fn read_file(path: &Path) -> Result<Vec<u8>> {
        let file = File::open(path).map_err(|source| Error::OpenPart {
            path: path.to_path_buf(),
            source,
        })?;

        let size = file
            .metadata()
            .map_err(|source| Error::ReadPart {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if size > MAX_PART_SIZE {
            return Err(Error::PartTooLarge {
                path: path.to_path_buf(),
                size,
                max: MAX_PART_SIZE,
            });
        }

        read_payload(file, size, path)
    }
}

/// Strip trailing `/` and `\` from a library root, keeping a bare `/`.
fn normalize_root(root: &Path) -> PathBuf {
    let root = root.components().as_path();
    match root.to_str() {
        Some(text) => {
            let trimmed = text.trim_end_matches(['/', '\\']);
            if trimmed.is_empty() {
                root.to_path_buf()
            } else {
                PathBuf::from(trimmed)
            }
        }
        None => root.to_path_buf(),
    }
}

/// Read exactly `size` bytes from `reader`.
fn read_payload(reader: impl Read, size: u64, path: &Path) -> Result<Vec<u8>> {
    let mut payload = Vec::with_capacity(size as usize);
    let count = reader
        .take(size)
        .read_to_end(&mut payload)
        .map_err(|source| Error::ReadPart {
            path: path.to_path_buf(),
            source,
        })? as u64;

    if count != size {
        return Err(Error::ShortRead {
            path: path.to_path_buf(),
            expected: size,
            actual: count,
        });
    }

    debug!("Read {count} bytes from {}", path.display());
    Ok(payload)
}

impl PartSource for DirSource {
    fn source_type(&self) -> &'static str {
        DIR_SOURCE_TYPE
    }

    fn source_uri(&self) -> String {
        self.root.display().to_string()
    }

    fn categories(&self) -> Vec<String> {
        self.cache.categories().iter().cloned().collect()
    }

    fn categorical_part_names(&self, category: &str) -> Vec<PartName> {
        let part_names = self.cache.part_names();

        if category.is_empty() {
            return part_names.iter().cloned().collect();
        }

        // [category + "/", category + "0"): '0' follows '/'
        let lower = PartName::new(format!("{category}{}", char::from(NAME_SEPARATOR)));
        let upper = PartName::new(format!("{category}{}", char::from(NAME_SEPARATOR + 1)));

        if lower >= upper {
            return Vec::new();
        }

        part_names.range(lower..upper).cloned().collect()
    }

    fn read_part(&self, part_name: &str, revision: Option<&str>) -> Result<Vec<u8>> {
        self.lookup(&PartName::with_revision(
            part_name,
            revision.unwrap_or_default(),
        ))?;

        // the file comes from the name as given, without the revision
        Self::read_file(&build_file_path(&self.root, &PartName::new(part_name)))
    }
}

impl fmt::Display for DirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "categories:")?;
        for category in self.cache.categories() {
            writeln!(f, " '{category}'")?;
        }
        writeln!(f)?;
        writeln!(f, "parts:")?;
        for name in self.cache.part_names() {
            writeln!(f, " '{name}'")?;
        }
        Ok(())
    }
}
