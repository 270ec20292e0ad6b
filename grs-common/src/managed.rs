//! Managed-directory classification.
//!
//! The syncer maintains a per-user file listing the directory trees whose
//! git commands must be intercepted. A directory is managed when a list
//! entry is a textual prefix of it; matching is deliberately not
//! path-segment-aware so behavior stays identical to the list format the
//! syncer has always written (an entry `/home/u/proj` also matches
//! `/home/u/project2`).

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Return the managed root `cwd` falls under, or `None`.
///
/// A missing list file is not an error; it yields no managed roots. The
/// first matching entry in file order wins. Entries are trimmed but never
/// normalized or validated.
pub fn find_managed_root(cwd: &Path, list_path: &Path) -> Option<PathBuf> {
    let content = match fs::read_to_string(list_path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %list_path.display(), %err, "no managed-directory list");
            return None;
        }
    };

    let cwd_str = cwd.to_string_lossy();
    for line in content.lines() {
        let root = line.trim();
        if root.is_empty() {
            continue;
        }
        if cwd_str.starts_with(root) {
            debug!(%root, cwd = %cwd_str, "directory is managed");
            return Some(PathBuf::from(root));
        }
    }
    None
}
