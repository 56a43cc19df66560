//! Project-wide alias scan.
//!
//! Stands in for the host bundler: walks a source tree, pulls import
//! specifiers out of each file, and drives the resolver once per alias
//! specifier, in parallel. Useful as a dry run before a build and as the
//! concurrent exercise of the per-directory synthesis guard.

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::resolver::Resolver;
use crate::search::to_unix;

/// Extensions of files worth scanning for import statements.
const SCAN_EXTENSIONS: [&str; 5] = ["ts", "tsx", "js", "jsx", "vue"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanEntry {
    pub file: String,
    pub specifier: String,
    pub resolved: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Extract import specifiers from one source file. ES `import ... from`,
/// bare side-effect imports and `require(...)` calls are recognized.
fn specifiers_in_file(source: &str) -> Vec<String> {
    let re_import =
        Regex::new(r#"(?m)^\s*import\s+(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#).unwrap();
    let re_require = Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();
    let mut out = Vec::new();
    for cap in re_import.captures_iter(source) {
        out.push(cap[1].to_string());
    }
    for cap in re_require.captures_iter(source) {
        out.push(cap[1].to_string());
    }
    out
}

fn scannable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SCAN_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Walk `root` and resolve every sentinel-prefixed import through
/// `resolver`. Entries come back sorted by file then specifier; resolution
/// runs in parallel across files.
pub fn scan_project(root: &Path, resolver: &Resolver) -> anyhow::Result<ScanReport> {
    let sentinel = resolver.config().sentinel;

    let mut files: Vec<String> = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.path().file_name().and_then(|s| s.to_str()).unwrap_or("");
            !(e.file_type().is_dir()
                && (name == "node_modules" || name == "dist" || name.starts_with('.')))
        })
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && scannable(path) {
            files.push(to_unix(path));
        }
    }
    files.sort();
    log::info!("scan: root={} files={}", root.display(), files.len());

    let mut entries: Vec<ScanEntry> = files
        .par_iter()
        .flat_map_iter(|file| {
            let Ok(source) = fs::read_to_string(file) else {
                log::warn!("scan: unreadable file skipped: {file}");
                return Vec::new();
            };
            specifiers_in_file(&source)
                .into_iter()
                .filter(|s| s.starts_with(sentinel))
                .map(|specifier| {
                    let resolved = resolver.resolve_id(&specifier, Some(file));
                    ScanEntry { file: file.clone(), specifier, resolved }
                })
                .collect()
        })
        .collect();

    entries.sort_by(|a, b| (&a.file, &a.specifier).cmp(&(&b.file, &b.specifier)));
    let resolved = entries.iter().filter(|e| e.resolved.is_some()).count();
    let unresolved = entries.len() - resolved;
    Ok(ScanReport { entries, resolved, unresolved })
}
