//! Revision-aware ordering of part names.
//!
//! All revisions of one part sort next to each other, newest first:
//!
//! ```text
//! Cat/res          (no revision)
//! Cat/res/rev10
//! Cat/res/rev2
//! Cat/res/rev1
//! Cat/resistor
//! ```

use crate::{NAME_SEPARATOR, REV_PREFIX, rev_suffix};
use std::cmp::Ordering;

/// Split a part name into its root and optional `revN` segment.
fn split_rev(name: &str) -> (&str, Option<&str>) {
    match rev_suffix(name, NAME_SEPARATOR) {
        // drop the separator along with the revision
        Some(rev) => (&name[..name.len() - rev.len() - 1], Some(rev)),
        None => (name, None),
    }
}

/// Compare two decimal digit strings by numeric value.
///
/// Leading zeros are ignored and no width limit applies.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two part names.
///
/// Roots (names without `/revN`) compare bytewise, a shorter root first when
/// one is a prefix of the other. For equal roots a name without a revision
/// comes first, then revisions in descending numeric order. Names with equal
/// roots and equal revision numbers compare equal.
///
/// ```
/// use partdir::compare_by_rev;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_by_rev("a/rev10", "a/rev2"), Ordering::Less);
/// assert_eq!(compare_by_rev("a", "a/rev1"), Ordering::Less);
/// assert_eq!(compare_by_rev("a/rev1", "b"), Ordering::Less);
/// ```
pub fn compare_by_rev(a: &str, b: &str) -> Ordering {
    let (root_a, rev_a) = split_rev(a);
    let (root_b, rev_b) = split_rev(b);

    root_a
        .as_bytes()
        .cmp(root_b.as_bytes())
        .then_with(|| match (rev_a, rev_b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            // higher revision is "less"
            (Some(a), Some(b)) => {
                compare_numeric(&b[REV_PREFIX.len()..], &a[REV_PREFIX.len()..])
            }
        })
}
