//! custom-config CLI
//!
//! Entry point for the `custom-config` command-line tool.

use clap::Parser;
use custom_config::config::{EffectiveConfig, REPO_CONFIG_FILE};
use custom_config::options::{ArgList, NpmConfigArgv, AnyOf, CREATE_FLAG, DELETE_FLAG, REPAIR_FLAG};
use custom_config::paths::{absolutize, GivenPaths};
use custom_config::reporter::{ConsoleReporter, Reporter, Target};
use custom_config::resolver::{Halt, OverlayResolver, ResolutionReport};
use custom_config::{JsonManifestStore, KeyCheck};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CUSTOM_CONFIG_LOG";

#[derive(Parser)]
#[command(name = "custom-config")]
#[command(about = "Resolve custom project paths from package.json", version)]
struct Cli {
    /// Project root containing the manifest
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Path to repo settings file (default: <project-root>/.custom-config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Create the custom configuration with empty values
    #[arg(long = "createCustomConfiguration")]
    create: bool,

    /// Delete the custom configuration
    #[arg(long = "deleteCustomConfiguration")]
    delete: bool,

    /// Delete the custom configuration so it can be created again
    #[arg(long = "repairCustomConfiguration")]
    repair: bool,

    /// Overlay key validation (exact or count)
    #[arg(long)]
    key_check: Option<KeyCheck>,

    /// Do not clear the terminal before resolving
    #[arg(long)]
    no_clear: bool,

    /// Output resolved paths as JSON
    #[arg(long)]
    json: bool,

    /// Print the effective settings and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let root = match absolutize(&cli.project_root) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error resolving project root {}: {}", cli.project_root.display(), e);
            process::exit(1);
        }
    };

    let repo_config = cli.config.clone().unwrap_or_else(|| root.join(REPO_CONFIG_FILE));
    let effective = match EffectiveConfig::build(
        host_config_path().as_deref(),
        Some(&repo_config),
        cli_overrides(&cli),
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };

    if cli.print_config {
        match effective.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing settings: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    run_resolve(&cli, &root, &effective);
}

fn run_resolve(cli: &Cli, root: &Path, effective: &EffectiveConfig) {
    let settings = effective.settings().clone();
    let given = GivenPaths::for_project(root, &settings.manifest.file);

    // Keep stdout clean for JSON consumers
    let target = if cli.json { Target::Stderr } else { Target::Stdout };
    let reporter = ConsoleReporter::new(target, &settings.output);

    let options = match option_source(cli) {
        Ok(o) => o,
        Err(e) => {
            reporter.error(&[e.to_string()]);
            reporter.fatal(1);
        }
    };

    let store = JsonManifestStore::new(settings.manifest.indent);
    let manifest_file = settings.manifest.file.clone();
    let mut resolver = OverlayResolver::new(store, options, reporter, settings);

    let resolved = match resolver.resolve(&given) {
        Ok(paths) => paths,
        Err(halt) => {
            tracing::debug!(%halt, code = halt.exit_code(), "resolution halted");
            let reporter = resolver.reporter();
            if let Halt::Failed(e) = &halt {
                reporter.error(&e.report_lines(&manifest_file));
            }
            if halt.shows_banner() {
                reporter.fatal(halt.exit_code());
            }
            reporter.exit(halt.exit_code());
        }
    };

    let report = ResolutionReport::new(&given, &resolved, resolver.overlay_applied());
    if cli.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", report.to_human());
    }
}

/// Flags parsed by clap plus whatever npm recorded for this invocation.
fn option_source(cli: &Cli) -> Result<AnyOf, custom_config::options::OptionsError> {
    let args = ArgList::default()
        .with_flag(CREATE_FLAG, cli.create)
        .with_flag(DELETE_FLAG, cli.delete)
        .with_flag(REPAIR_FLAG, cli.repair);

    let mut source = AnyOf::new().with(args);
    if let Some(npm) = NpmConfigArgv::from_env()? {
        source = source.with(npm);
    }
    Ok(source)
}

fn cli_overrides(cli: &Cli) -> Option<serde_json::Value> {
    let mut overrides = serde_json::Map::new();
    if let Some(check) = cli.key_check {
        overrides.insert(
            "validation".to_string(),
            serde_json::json!({ "key_check": check }),
        );
    }
    if cli.no_clear {
        overrides.insert(
            "output".to_string(),
            serde_json::json!({ "clear_console": false }),
        );
    }
    if overrides.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(overrides))
    }
}

fn host_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/custom-config/config.toml"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
