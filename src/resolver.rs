//! The per-specifier resolution hook.
//!
//! Mirrors a bundler's `resolveId` contract: given a specifier and the
//! importing file, return an absolute forward-slash path when the
//! specifier is an owned alias, or `None` to defer to the host's own
//! resolution. Successful resolutions trigger tsconfig synthesis as a
//! detached second step that can never change the already-decided result.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::ResolverConfig;
use crate::search::{entry_exists, find_downward, find_upward, to_unix, with_suffix};
use crate::tsconfig::{self, Synthesis};

pub struct Resolver {
    config: ResolverConfig,
    /// Directories already handed to the synthesizer by this process.
    /// Serializes creation per target path so concurrent resolutions
    /// keep the one-write contract.
    synthesized: Mutex<HashSet<PathBuf>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config, synthesized: Mutex::new(HashSet::new()) }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one import specifier. Returns `None` for everything this
    /// resolver does not own: non-sentinel specifiers, importers outside
    /// the scoped root, a missing importer, an empty alias name, and
    /// aliases with no filesystem match.
    pub fn resolve_id(&self, specifier: &str, importer: Option<&str>) -> Option<String> {
        let importer = importer?;
        if !specifier.starts_with(self.config.sentinel)
            || !importer.contains(self.config.scoped.as_str())
        {
            return None;
        }

        let stripped = &specifier[self.config.sentinel.len_utf8()..];
        let mut parts = stripped.split('/');
        let alias = parts.next().unwrap_or("");
        if alias.is_empty() {
            // bare "$" or "$/x": reject instead of searching an empty name
            return None;
        }
        let rest: Vec<&str> = parts.filter(|s| !s.is_empty()).collect();

        let importer_dir = Path::new(importer).parent()?;
        let base = find_downward(
            importer_dir,
            alias,
            &self.config.extensions,
            self.config.max_depth,
        )?;

        let base = to_unix(&base);
        let full = if rest.is_empty() {
            base
        } else {
            format!("{}/{}", base, rest.join("/"))
        };
        let resolved = self.complete(&full)?;

        // Step two, after the return value is fixed: best-effort tsconfig
        // synthesis anchored at the ancestor that contains the alias.
        self.ensure_tsconfig(importer_dir, alias);

        Some(resolved)
    }

    /// Candidate completion: the path as-is first, then each recognized
    /// extension in declared order.
    fn complete(&self, full: &str) -> Option<String> {
        let path = Path::new(full);
        if entry_exists(path) {
            return Some(full.to_string());
        }
        for ext in &self.config.extensions {
            let candidate = with_suffix(path, ext);
            if entry_exists(&candidate) {
                return Some(to_unix(&candidate));
            }
        }
        None
    }

    fn ensure_tsconfig(&self, importer_dir: &Path, alias: &str) {
        let Some(anchor) = find_upward(
            importer_dir,
            alias,
            &self.config.extensions,
            self.config.max_depth,
        ) else {
            return;
        };

        {
            let mut seen = self
                .synthesized
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !seen.insert(anchor.clone()) {
                return;
            }
        }

        match tsconfig::synthesize(&anchor, alias, &self.config.scoped) {
            Ok(Synthesis::Written(path)) => {
                log::info!("tsconfig created: {}", path.display());
            }
            Ok(Synthesis::Skipped(_)) => {}
            Err(e) => {
                log::warn!("tsconfig synthesis failed in {}: {}", anchor.display(), e);
            }
        }
    }
}
