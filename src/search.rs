//! Filesystem walks that locate the directory backing an alias.
//!
//! Two directions share the same probe rules but differ in what they
//! return: the downward walk yields the alias's own base path (what an
//! import resolves against), the upward walk yields the ancestor that
//! contains the alias (where a tsconfig belongs). In multi-package trees
//! the two can disagree, which is why both exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Metadata probe that never errors: not-found (and a file standing in
/// the middle of the path) is a plain miss, anything else is logged and
/// treated as a miss at this probe only.
fn probe(path: &Path) -> Option<fs::Metadata> {
    match fs::metadata(path) {
        Ok(m) => Some(m),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            None
        }
        Err(e) => {
            log::warn!("probe failed for {}: {}", path.display(), e);
            None
        }
    }
}

fn dir_exists(path: &Path) -> bool {
    probe(path).map(|m| m.is_dir()).unwrap_or(false)
}

pub(crate) fn entry_exists(path: &Path) -> bool {
    probe(path).is_some()
}

/// Append a suffix like ".ts" to a path without treating it as an
/// extension replacement.
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// Convert a path to the forward-slash convention used in resolved output.
pub fn to_unix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Find the nearest base path for `alias`, searching `start_dir` first and
/// then each ancestor. A hit is either a directory named `alias` or a file
/// `alias<ext>` for some recognized extension; in the file case the
/// returned path is the extensionless base (completion happens later, at
/// resolution time). Returns `None` once the filesystem root's parent is
/// reached or `max_depth` hops are spent.
pub fn find_downward(
    start_dir: &Path,
    alias: &str,
    extensions: &[&str],
    max_depth: usize,
) -> Option<PathBuf> {
    let mut cur = start_dir.to_path_buf();
    for _ in 0..=max_depth {
        let full = cur.join(alias);
        if dir_exists(&full) {
            return Some(full);
        }
        for ext in extensions {
            if entry_exists(&with_suffix(&full, ext)) {
                return Some(full);
            }
        }
        match cur.parent() {
            Some(parent) => cur = parent.to_path_buf(),
            None => return None,
        }
    }
    log::warn!(
        "alias search for '{}' from {} exceeded max depth {}",
        alias,
        start_dir.display(),
        max_depth
    );
    None
}

/// Find the nearest ancestor of `start_dir` (inclusive) that contains
/// `alias` as a directory or as a file with a recognized extension.
/// The filesystem root itself is never checked: starting at the root
/// skips the loop entirely and returns `None`.
pub fn find_upward(
    start_dir: &Path,
    alias: &str,
    extensions: &[&str],
    max_depth: usize,
) -> Option<PathBuf> {
    let mut cur = start_dir.to_path_buf();
    let mut hops = 0;
    while let Some(parent) = cur.parent().map(Path::to_path_buf) {
        let folder = cur.join(alias);
        if dir_exists(&folder) {
            return Some(cur);
        }
        for ext in extensions {
            if entry_exists(&with_suffix(&folder, ext)) {
                return Some(cur);
            }
        }
        cur = parent;
        hops += 1;
        if hops > max_depth {
            log::warn!(
                "ancestor search for '{}' from {} exceeded max depth {}",
                alias,
                start_dir.display(),
                max_depth
            );
            return None;
        }
    }
    None
}
