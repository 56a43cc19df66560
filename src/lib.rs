pub mod config;
pub mod resolver;
pub mod scaffold;
pub mod scan;
pub mod search;
pub mod tsconfig;

pub use config::{DEFAULT_MAX_DEPTH, DEFAULT_SCOPED, FILE_TYPE_LIST, ResolverConfig};
pub use resolver::Resolver;
pub use scaffold::{
    Injection, ScaffoldAction, ScaffoldError, ensure_file, inject_plugin, write_plugin,
};
pub use scan::{ScanEntry, ScanReport, scan_project};
pub use search::{find_downward, find_upward};
pub use tsconfig::{Synthesis, SynthesisError, TsConfig, synthesize};
