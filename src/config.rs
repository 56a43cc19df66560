/// Recognized source-file suffixes, probed in declaration order.
/// `.ts` wins over `.js` for the same base name.
pub const FILE_TYPE_LIST: [&str; 6] = [".ts", ".d.ts", ".tsx", ".js", ".jsx", ".vue"];

/// Default scoped-root marker: only importers whose path contains this
/// substring participate in alias resolution.
pub const DEFAULT_SCOPED: &str = "/src";

/// Upper bound on ancestor hops for both walk directions. The filesystem
/// root terminates the walk naturally; the bound exists for symlink loops.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Immutable resolver configuration, fixed at construction time.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Sentinel character that marks an alias specifier.
    pub sentinel: char,
    /// Scoped-root marker (gates importers, anchors depth computation).
    pub scoped: String,
    /// Extension candidates tried when a bare path is not importable.
    pub extensions: Vec<&'static str>,
    /// Maximum ancestor hops per walk.
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            sentinel: '$',
            scoped: DEFAULT_SCOPED.to_string(),
            extensions: FILE_TYPE_LIST.to_vec(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Config with a custom scoped-root marker, defaults elsewhere.
    pub fn with_scoped(scoped: impl Into<String>) -> Self {
        Self { scoped: scoped.into(), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let cfg = ResolverConfig::default();
        assert_eq!(cfg.sentinel, '$');
        assert_eq!(cfg.scoped, "/src");
        assert_eq!(cfg.extensions[0], ".ts");
        assert_eq!(cfg.extensions.last(), Some(&".vue"));
    }

    #[test]
    fn custom_scope() {
        let cfg = ResolverConfig::with_scoped("/app");
        assert_eq!(cfg.scoped, "/app");
        assert_eq!(cfg.max_depth, DEFAULT_MAX_DEPTH);
    }
}
