use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use std::path::Path;
use vite_path_alias::{
    DEFAULT_SCOPED, Injection, Resolver, ResolverConfig, ScaffoldAction, Synthesis, scan_project,
    synthesize,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "vite-path-alias", version, about = "Resolve $-prefixed path aliases and generate per-directory tsconfig files")]
struct Args {
    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve alias specifiers against an importing file
    Resolve {
        /// Importing file the specifiers appear in
        #[arg(long = "importer")]
        importer: String,
        /// Scoped-root marker gating resolution
        #[arg(long = "scoped", default_value = DEFAULT_SCOPED)]
        scoped: String,
        /// Specifiers to resolve; read from stdin when piped and omitted
        specifiers: Vec<String>,
    },
    /// Scan a project tree and resolve every alias import found
    Check {
        /// Project root to walk
        #[arg(default_value = ".")]
        root: String,
        #[arg(long = "scoped", default_value = DEFAULT_SCOPED)]
        scoped: String,
    },
    /// Generate a tsconfig.json for one directory
    Synth {
        /// Directory receiving the tsconfig.json
        #[arg(long = "dir")]
        dir: String,
        /// Alias name to map in the generated paths
        #[arg(long = "alias")]
        alias: String,
        #[arg(long = "scoped", default_value = DEFAULT_SCOPED)]
        scoped: String,
    },
    /// Install the TypeScript plugin into a Vite project
    Init {
        /// Project root containing vite.config.ts
        #[arg(long = "project")]
        project: String,
        /// Optionally pre-create a tsconfig.json in this directory
        #[arg(long = "tsconfig-dir")]
        tsconfig_dir: Option<String>,
        /// Alias name used for the pre-created tsconfig
        #[arg(long = "alias", default_value = "utils")]
        alias: String,
        #[arg(long = "scoped", default_value = DEFAULT_SCOPED)]
        scoped: String,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(""))
        .format_timestamp(None)
        .try_init();
    let args = Args::parse();

    match args.cmd {
        Command::Resolve { importer, scoped, specifiers } => {
            run_resolve(args.format, &importer, scoped, specifiers)
        }
        Command::Check { root, scoped } => run_check(args.format, &root, scoped),
        Command::Synth { dir, alias, scoped } => run_synth(&dir, &alias, &scoped),
        Command::Init { project, tsconfig_dir, alias, scoped } => {
            run_init(&project, tsconfig_dir.as_deref(), &alias, &scoped)
        }
    }
}

fn specifiers_from_stdin() -> anyhow::Result<Vec<String>> {
    if io::stdin().is_terminal() {
        anyhow::bail!("no specifiers given: pass SPECIFIER arguments or pipe a list");
    }
    let mut s = String::new();
    io::stdin().read_to_string(&mut s)?;
    Ok(s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn run_resolve(
    fmt: OutputFormat,
    importer: &str,
    scoped: String,
    specifiers: Vec<String>,
) -> anyhow::Result<()> {
    let specifiers = if specifiers.is_empty() { specifiers_from_stdin()? } else { specifiers };
    let resolver = Resolver::new(ResolverConfig::with_scoped(scoped));
    log::info!("mode=resolve importer={} specifiers={}", importer, specifiers.len());

    let rows: Vec<serde_json::Value> = specifiers
        .iter()
        .map(|s| {
            serde_json::json!({
                "specifier": s,
                "resolved": resolver.resolve_id(s, Some(importer)),
            })
        })
        .collect();
    match fmt {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&rows)?),
    }
    Ok(())
}

fn run_check(fmt: OutputFormat, root: &str, scoped: String) -> anyhow::Result<()> {
    let resolver = Resolver::new(ResolverConfig::with_scoped(scoped));
    let report = scan_project(Path::new(root), &resolver)?;
    log::info!(
        "mode=check root={} resolved={} unresolved={}",
        root,
        report.resolved,
        report.unresolved
    );
    match fmt {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
    }
    Ok(())
}

fn run_synth(dir: &str, alias: &str, scoped: &str) -> anyhow::Result<()> {
    match synthesize(Path::new(dir), alias, scoped)? {
        Synthesis::Written(path) => println!("tsconfig.json created: {}", path.display()),
        Synthesis::Skipped(path) => println!("tsconfig.json already exists: {}", path.display()),
    }
    Ok(())
}

fn run_init(
    project: &str,
    tsconfig_dir: Option<&str>,
    alias: &str,
    scoped: &str,
) -> anyhow::Result<()> {
    let root = Path::new(project);

    if let Some(dir) = tsconfig_dir {
        match synthesize(Path::new(dir), alias, scoped)? {
            Synthesis::Written(path) => println!("tsconfig.json created: {}", path.display()),
            Synthesis::Skipped(path) => {
                println!("tsconfig.json already exists: {}", path.display())
            }
        }
    }

    match vite_path_alias::write_plugin(root)? {
        ScaffoldAction::Created(path) => println!("plugin created: {}", path.display()),
        ScaffoldAction::AlreadyExists(path) => {
            println!("plugin already exists: {}", path.display())
        }
    }

    let vite_config = root.join("vite.config.ts");
    match vite_path_alias::inject_plugin(&vite_config)? {
        Injection::Injected => println!("plugin registered in {}", vite_config.display()),
        Injection::AlreadyInjected => {
            println!("plugin already registered, nothing to inject")
        }
    }
    Ok(())
}
