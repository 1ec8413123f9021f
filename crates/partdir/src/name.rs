//! Part name codec.
//!
//! Translates between logical part names (`[category/]basename[/revN]`)
//! and physical file names (`[category/]basename.part[.revN]`). The mapping
//! is lossless: every name produced by [`classify_entry`] is turned back into
//! the file it came from by [`build_file_path`].

use crate::ordering::compare_by_rev;
use crate::{FILE_SEPARATOR, NAME_SEPARATOR, PART_EXTENSION, REV_PREFIX};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// Return the trailing `revN` of `segment`, if any.
///
/// A match needs one or more ASCII digits at the very end, preceded by
/// `rev`, preceded by `boundary`. The returned slice starts at `rev` and
/// excludes the boundary byte.
///
/// ```
/// use partdir::rev_suffix;
///
/// assert_eq!(rev_suffix("Cat/res/rev12", b'/'), Some("rev12"));
/// assert_eq!(rev_suffix("res.part.rev3", b'.'), Some("rev3"));
/// assert_eq!(rev_suffix("rev3", b'/'), None);
/// assert_eq!(rev_suffix("Cat/res/rev", b'/'), None);
/// ```
pub fn rev_suffix(segment: &str, boundary: u8) -> Option<&str> {
    let bytes = segment.as_bytes();
    let digits = bytes
        .iter()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digits == 0 {
        return None;
    }

    let sep = (bytes.len() - digits).checked_sub(REV_PREFIX.len() + 1)?;
    let rev_start = sep + 1;

    if bytes[sep] == boundary && bytes[rev_start..].starts_with(REV_PREFIX.as_bytes()) {
        Some(&segment[rev_start..])
    } else {
        None
    }
}

/// Classify one directory entry.
///
/// Returns the part name for `entry` found under `category` (empty at the
/// root), or `None` if the entry is not a part file for the given mode.
///
/// The rightmost `.part` in `entry` is the extension marker, so basenames
/// may contain `.part` themselves. In versioned mode the marker must be
/// followed by exactly `.revN`; otherwise it must end the entry.
pub fn classify_entry(entry: &str, category: &str, versioning: bool) -> Option<PartName> {
    let cp = entry.rfind(PART_EXTENSION)?;
    if cp == 0 {
        return None;
    }

    let basename = &entry[..cp];
    let tail = &entry[cp + PART_EXTENSION.len()..];

    let mut name = String::with_capacity(category.len() + entry.len() + 1);
    if !category.is_empty() {
        name.push_str(category);
        name.push(char::from(NAME_SEPARATOR));
    }
    name.push_str(basename);

    if versioning {
        let rev = rev_suffix(tail, FILE_SEPARATOR)?;
        // ".revN" and nothing else
        if tail.len() != rev.len() + 1 {
            return None;
        }
        name.push(char::from(NAME_SEPARATOR));
        name.push_str(rev);
    } else {
        if !tail.is_empty() {
            return None;
        }
        // "<category>/revN" would read back as a revision of "<category>"
        if rev_suffix(&name, NAME_SEPARATOR).is_some() {
            return None;
        }
    }

    Some(PartName(name))
}

/// Build the file path for `name` below `root`.
///
/// `Cat/res/rev2` becomes `root/Cat/res.part.rev2`; `Cat/res` becomes
/// `root/Cat/res.part`.
pub fn build_file_path(root: &Path, name: &PartName) -> PathBuf {
    let mut path = root.to_path_buf();
    if let Some(category) = name.category() {
        path.push(category);
    }

    let file_name = match name.revision() {
        Some(rev) => format!(
            "{}{PART_EXTENSION}{}{rev}",
            name.basename(),
            char::from(FILE_SEPARATOR)
        ),
        None => format!("{}{PART_EXTENSION}", name.basename()),
    };
    path.push(file_name);
    path
}

/// A logical part name: `[category/]basename[/revN]`.
///
/// Equality and ordering follow [`compare_by_rev`]: names group by root and
/// the newest revision of a root sorts first. Two spellings of the same
/// revision number (`rev1`, `rev01`) are the same name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartName(String);

impl PartName {
    /// Wrap a part name string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Join a name and a revision segment (`rev2`) into `name/rev2`.
    ///
    /// An empty revision leaves the name unchanged.
    pub fn with_revision(name: &str, revision: &str) -> Self {
        if revision.is_empty() {
            Self::new(name)
        } else {
            Self(format!("{name}{}{revision}", char::from(NAME_SEPARATOR)))
        }
    }

    /// The full name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// The trailing `revN` segment, if any.
    pub fn revision(&self) -> Option<&str> {
        rev_suffix(&self.0, NAME_SEPARATOR)
    }

    /// Numeric value of the revision, if present and representable.
    pub fn revision_number(&self) -> Option<u64> {
        self.revision()
            .and_then(|rev| rev[REV_PREFIX.len()..].parse().ok())
    }

    /// The name without its `/revN` segment.
    pub fn root(&self) -> &str {
        match self.revision() {
            Some(rev) => &self.0[..self.0.len() - rev.len() - 1],
            None => &self.0,
        }
    }

    /// The category segment, if the root has one.
    pub fn category(&self) -> Option<&str> {
        self.root()
            .split_once(char::from(NAME_SEPARATOR))
            .map(|(category, _)| category)
    }

    /// The basename: the root without its category.
    pub fn basename(&self) -> &str {
        let root = self.root();
        root.split_once(char::from(NAME_SEPARATOR))
            .map_or(root, |(_, basename)| basename)
    }
}

impl fmt::Display for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PartName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PartName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq for PartName {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PartName {}

impl PartialOrd for PartName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PartName {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_by_rev(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rev_suffix() {
        assert_eq!(rev_suffix("a/rev1", b'/'), Some("rev1"));
        assert_eq!(rev_suffix("a/rev0042", b'/'), Some("rev0042"));
        assert_eq!(rev_suffix(".rev7", b'.'), Some("rev7"));

        // wrong boundary
        assert_eq!(rev_suffix("a.rev1", b'/'), None);
        assert_eq!(rev_suffix("a/rev1", b'.'), None);
        // no boundary at all
        assert_eq!(rev_suffix("rev1", b'/'), None);
        // no digits
        assert_eq!(rev_suffix("a/rev", b'/'), None);
        // digits not preceded by "rev"
        assert_eq!(rev_suffix("a/re1", b'/'), None);
        assert_eq!(rev_suffix("a/xrev1", b'/'), None);
        assert_eq!(rev_suffix("", b'/'), None);
        assert_eq!(rev_suffix("12", b'/'), None);
    }

    #[test]
    fn test_classify_unversioned() {
        assert_eq!(
            classify_entry("a.part", "", false).map(PartName::into_string),
            Some("a".into())
        );
        assert_eq!(
            classify_entry("b.part", "Cat", false).map(PartName::into_string),
            Some("Cat/b".into())
        );
        assert!(classify_entry("a.part.rev1", "", false).is_none());
        assert!(classify_entry("a.parts", "", false).is_none());
        assert!(classify_entry("a.txt", "", false).is_none());
    }

    #[test]
    fn test_classify_versioned() {
        assert_eq!(
            classify_entry("a.part.rev1", "", true).map(PartName::into_string),
            Some("a/rev1".into())
        );
        assert_eq!(
            classify_entry("b.part.rev12", "Cat", true).map(PartName::into_string),
            Some("Cat/b/rev12".into())
        );
        assert!(classify_entry("a.part", "", true).is_none());
        assert!(classify_entry("a.part.rev", "", true).is_none());
        assert!(classify_entry("a.part.revx", "", true).is_none());
        // rev must follow ".part." immediately
        assert!(classify_entry("a.part.x.rev1", "", true).is_none());
        assert!(classify_entry("a.partrev1", "", true).is_none());
    }

    #[test]
    fn test_classify_rejects_empty_basename() {
        assert!(classify_entry(".part", "", false).is_none());
        assert!(classify_entry(".part.rev1", "", true).is_none());
    }

    #[test]
    fn test_classify_uses_last_part_marker() {
        assert_eq!(
            classify_entry("x.part.part", "", false).map(PartName::into_string),
            Some("x.part".into())
        );
        assert_eq!(
            classify_entry("x.part.rev1.part.rev2", "", true).map(PartName::into_string),
            Some("x.part.rev1/rev2".into())
        );
    }

    #[test]
    fn test_classify_rejects_ambiguous_categorized_rev_basename() {
        assert!(classify_entry("rev3.part", "Cat", false).is_none());
        // fine at the root, and fine with a real revision
        assert!(classify_entry("rev3.part", "", false).is_some());
        assert_eq!(
            classify_entry("rev3.part.rev1", "Cat", true).map(PartName::into_string),
            Some("Cat/rev3/rev1".into())
        );
    }

    #[test]
    fn test_name_accessors() {
        let name = PartName::new("Cat/res/rev10");
        assert_eq!(name.root(), "Cat/res");
        assert_eq!(name.revision(), Some("rev10"));
        assert_eq!(name.revision_number(), Some(10));
        assert_eq!(name.category(), Some("Cat"));
        assert_eq!(name.basename(), "res");

        let name = PartName::new("res");
        assert_eq!(name.root(), "res");
        assert_eq!(name.revision(), None);
        assert_eq!(name.category(), None);
        assert_eq!(name.basename(), "res");

        let name = PartName::new("res/rev3");
        assert_eq!(name.root(), "res");
        assert_eq!(name.category(), None);
        assert_eq!(name.basename(), "res");
    }

    #[test]
    fn test_with_revision() {
        assert_eq!(PartName::with_revision("a", "rev2").as_str(), "a/rev2");
        assert_eq!(PartName::with_revision("a", "").as_str(), "a");
    }

    #[test]
    fn test_equivalent_revision_spellings() {
        assert_eq!(PartName::new("a/rev1"), PartName::new("a/rev01"));
        assert_ne!(PartName::new("a/rev1"), PartName::new("a/rev2"));
        assert_ne!(PartName::new("a"), PartName::new("a/rev0"));
    }

    #[test]
    fn test_build_file_path() {
        let root = Path::new("lib");
        assert_eq!(
            build_file_path(root, &PartName::new("a")),
            root.join("a.part")
        );
        assert_eq!(
            build_file_path(root, &PartName::new("Cat/b")),
            root.join("Cat").join("b.part")
        );
        assert_eq!(
            build_file_path(root, &PartName::new("Cat/b/rev3")),
            root.join("Cat").join("b.part.rev3")
        );
        assert_eq!(
            build_file_path(root, &PartName::new("b/rev3")),
            root.join("b.part.rev3")
        );
    }

    fn basename() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.-]{0,8}(\\.part)?[A-Za-z0-9_-]{1,8}"
    }

    fn category() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[A-Za-z][A-Za-z0-9_-]{0,8}"]
    }

    proptest! {
        /// Every classified file maps back to the path it came from.
        #[test]
        fn classify_then_build_restores_path(
            base in basename(),
            category in category(),
            rev in proptest::option::of(0u32..100_000),
        ) {
            let entry = match rev {
                Some(n) => format!("{base}.part.rev{n}"),
                None => format!("{base}.part"),
            };
            let root = Path::new("root");

            if let Some(name) = classify_entry(&entry, &category, rev.is_some()) {
                let mut expected = root.to_path_buf();
                if !category.is_empty() {
                    expected.push(&category);
                }
                expected.push(&entry);
                prop_assert_eq!(build_file_path(root, &name), expected);
            }
        }
    }

    proptest! {
        /// Every produced name reads back through its own file name.
        #[test]
        fn build_then_classify_restores_name(
            base in basename(),
            category in category(),
            rev in proptest::option::of(0u32..100_000),
        ) {
            let entry = match rev {
                Some(n) => format!("{base}.part.rev{n}"),
                None => format!("{base}.part"),
            };
            if let Some(name) = classify_entry(&entry, &category, rev.is_some()) {
                let path = build_file_path(Path::new("root"), &name);
                let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
                let again = classify_entry(file_name, name.category().unwrap_or(""), rev.is_some());
                prop_assert_eq!(again.map(PartName::into_string), Some(name.into_string()));
            }
        }
    }
}
