//! Per-directory tsconfig synthesis.
//!
//! A resolved alias gets a generated `tsconfig.json` next to it so the
//! editor agrees with the bundler about what `$alias/*` means. The file
//! is created at most once per directory and never merged or rewritten.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::search::to_unix;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("scoped marker '{scoped}' not found in {path}")]
    ScopeNotFound { scoped: String, path: String },
    #[error("{0} is the scoped root itself; a generated tsconfig would extend itself")]
    AtScopeRoot(String),
    #[error("write tsconfig: {0}")]
    Io(#[from] io::Error),
    #[error("serialize tsconfig: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of one synthesis attempt. `Skipped` covers both the up-front
/// existence check and losing a create race to another caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    Written(PathBuf),
    Skipped(PathBuf),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TsConfig {
    pub extends: String,
    #[serde(rename = "compilerOptions")]
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompilerOptions {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    pub paths: BTreeMap<String, Vec<String>>,
}

/// Number of directory levels between the generated file and the scoped
/// root: non-empty path segments after the first marker occurrence, minus
/// the trailing file name.
fn alias_depth(tsconfig_path: &str, scoped: &str) -> Result<usize, SynthesisError> {
    let idx = tsconfig_path
        .find(scoped)
        .ok_or_else(|| SynthesisError::ScopeNotFound {
            scoped: scoped.to_string(),
            path: tsconfig_path.to_string(),
        })?;
    let after = &tsconfig_path[idx + scoped.len()..];
    let segments = after.split('/').filter(|s| !s.is_empty()).count();
    if segments <= 1 {
        return Err(SynthesisError::AtScopeRoot(tsconfig_path.to_string()));
    }
    Ok(segments - 1)
}

fn dotdot_chain(n: usize) -> String {
    vec![".."; n].join("/")
}

/// Build the record for an alias at the given depth below the scoped root.
fn build_record(alias: &str, depth: usize) -> TsConfig {
    let extends = format!("{}/tsconfig.json", dotdot_chain(depth));
    // depth 1 would otherwise render an empty prefix and an absolute glob
    let at_glob = if depth == 1 {
        "./*".to_string()
    } else {
        format!("{}/*", dotdot_chain(depth - 1))
    };
    let mut paths = BTreeMap::new();
    paths.insert(format!("${alias}/*"), vec![format!("./{alias}/*")]);
    paths.insert("@/*".to_string(), vec![at_glob]);
    TsConfig {
        extends,
        compiler_options: CompilerOptions { base_url: ".".to_string(), paths },
    }
}

/// Create `target_dir/tsconfig.json` if absent. The write goes through a
/// temp file in the same directory and a no-clobber persist, so two racing
/// callers produce exactly one file and one of them reports `Skipped`.
pub fn synthesize(
    target_dir: &Path,
    alias: &str,
    scoped: &str,
) -> Result<Synthesis, SynthesisError> {
    let tsconfig_path = target_dir.join("tsconfig.json");
    if tsconfig_path.exists() {
        return Ok(Synthesis::Skipped(tsconfig_path));
    }

    let depth = alias_depth(&to_unix(&tsconfig_path), scoped)?;
    let record = build_record(alias, depth);
    let json = serde_json::to_string_pretty(&record)?;

    let mut tmp = NamedTempFile::new_in(target_dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    match tmp.persist_noclobber(&tsconfig_path) {
        Ok(_) => {
            log::debug!("tsconfig written: {}", tsconfig_path.display());
            Ok(Synthesis::Written(tsconfig_path))
        }
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            Ok(Synthesis::Skipped(tsconfig_path))
        }
        Err(e) => Err(SynthesisError::Io(e.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn depth_counts_non_empty_segments() {
        let d = alias_depth("/proj/src/a/utils/tsconfig.json", "/src").unwrap();
        assert_eq!(d, 2);
    }

    #[test]
    fn depth_one_level_below_root() {
        let d = alias_depth("/proj/src/utils/tsconfig.json", "/src").unwrap();
        assert_eq!(d, 1);
    }

    #[test]
    fn depth_marker_missing_fails() {
        let err = alias_depth("/proj/lib/utils/tsconfig.json", "/src").unwrap_err();
        assert!(matches!(err, SynthesisError::ScopeNotFound { .. }));
    }

    #[test]
    fn depth_at_scope_root_fails() {
        let err = alias_depth("/proj/src/tsconfig.json", "/src").unwrap_err();
        assert!(matches!(err, SynthesisError::AtScopeRoot(_)));
    }

    #[test]
    fn record_shape_depth_two() {
        let rec = build_record("utils", 2);
        assert_eq!(rec.extends, "../../tsconfig.json");
        assert_eq!(rec.compiler_options.base_url, ".");
        assert_eq!(rec.compiler_options.paths["$utils/*"], vec!["./utils/*"]);
        assert_eq!(rec.compiler_options.paths["@/*"], vec!["../*"]);
    }

    #[test]
    fn record_depth_one_keeps_glob_relative() {
        let rec = build_record("store", 1);
        assert_eq!(rec.extends, "../tsconfig.json");
        assert_eq!(rec.compiler_options.paths["@/*"], vec!["./*"]);
    }

    #[test]
    fn serialized_key_order_and_indent() {
        let rec = build_record("utils", 2);
        let json = serde_json::to_string_pretty(&rec).unwrap();
        assert!(json.starts_with("{\n  \"extends\""));
        let dollar = json.find("$utils/*").unwrap();
        let at = json.find("@/*").unwrap();
        assert!(dollar < at);
    }

    #[test]
    fn synthesize_writes_once() {
        let td = tempdir().unwrap();
        let target = td.path().join("src/a/utils");
        fs::create_dir_all(&target).unwrap();

        let first = synthesize(&target, "utils", "/src").unwrap();
        let path = match first {
            Synthesis::Written(p) => p,
            other => panic!("expected write, got {other:?}"),
        };
        let content = fs::read_to_string(&path).unwrap();
        let parsed: TsConfig = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.extends, "../../tsconfig.json");

        let second = synthesize(&target, "utils", "/src").unwrap();
        assert_eq!(second, Synthesis::Skipped(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn synthesize_leaves_no_temp_files_on_skip() {
        let td = tempdir().unwrap();
        let target = td.path().join("src/utils");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("tsconfig.json"), "{}\n").unwrap();

        let out = synthesize(&target, "utils", "/src").unwrap();
        assert!(matches!(out, Synthesis::Skipped(_)));
        let entries: Vec<_> = fs::read_dir(&target).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read_to_string(target.join("tsconfig.json")).unwrap(), "{}\n");
    }

    #[test]
    fn synthesize_outside_scope_errors() {
        let td = tempdir().unwrap();
        let target = td.path().join("lib/utils");
        fs::create_dir_all(&target).unwrap();
        let err = synthesize(&target, "utils", "/zz-scope").unwrap_err();
        assert!(matches!(err, SynthesisError::ScopeNotFound { .. }));
    }
}
