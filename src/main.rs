//! catalog-diff: semantic diff of compiled configuration catalogs
//!
//! Compares the compiled catalogs of one node, or of every node in two
//! directories, and reports what was added, removed or changed.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use catalog_diff::{
    cli,
    config::{self, AppConfig, ConfigOverrides},
    model::SchemaGeneration,
    pipeline::exit_codes,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported catalog formats:",
        "\n  current schema: yaml, yml, marshal, pson, json",
        "\n  0.24 schema:    yaml, yml, marshal, pson"
    )
}

#[derive(Parser)]
#[command(name = "catalog-diff")]
#[command(version, long_version = build_long_version())]
#[command(about = "Semantic diff of compiled configuration catalogs", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No changes detected (or --fail-on-change not set)
    1  Changes detected with --fail-on-change
    3  Error occurred

EXAMPLES:
    # Diff two catalogs of the same node
    catalog-diff diff old/web01.json new/web01.json --pretty

    # Diff 0.24 catalogs, ignoring classes
    catalog-diff diff old.yaml new.yaml --schema 0.24 --exclude-classes

    # Diff every node in two directories
    catalog-diff fleet old/ new/ --threads 20 -O fleet.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "CATALOG_DIFF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Options shared by `diff` and `fleet`
#[derive(clap::Args)]
struct CompareArgs {
    /// Schema generation of both inputs
    #[arg(long, value_enum)]
    schema: Option<SchemaGeneration>,

    /// Drop Class resources from both catalogs before comparing
    #[arg(long)]
    exclude_classes: bool,

    /// Include a unified diff of every changed resource
    #[arg(long)]
    show_resource_diff: bool,

    /// Include a unified diff of every changed string parameter (default)
    #[arg(long, overrides_with = "no_content_diff")]
    content_diff: bool,

    /// Skip the per-parameter string diffs
    #[arg(long, overrides_with = "content_diff")]
    no_content_diff: bool,

    /// Parameter removed from every resource before comparing (repeatable)
    #[arg(long = "ignore-parameter", value_name = "NAME")]
    ignore_parameters: Vec<String>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Exit with code 1 if any changes detected
    #[arg(long)]
    fail_on_change: bool,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the old catalog
    old: PathBuf,

    /// Path to the new catalog
    new: PathBuf,

    #[command(flatten)]
    compare: CompareArgs,
}

/// Arguments for the `fleet` subcommand
#[derive(Parser)]
struct FleetArgs {
    /// Directory of old catalogs, one file per node
    old_dir: PathBuf,

    /// Directory of new catalogs, one file per node
    new_dir: PathBuf,

    /// Nodes diffed in parallel
    #[arg(long)]
    threads: Option<usize>,

    /// Number of nodes and failure groups listed in the summary
    #[arg(long)]
    changed_depth: Option<usize>,

    #[command(flatten)]
    compare: CompareArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the catalogs of one node
    Diff(DiffArgs),

    /// Compare every node found in two catalog directories
    Fleet(FleetArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .catalog-diff.yaml in the current directory
    Init,
    /// Print the JSON Schema of the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Build the CLI layer of the configuration.
///
/// Flags that were not given stay `None` so file values survive
/// [`AppConfig::merge`].
fn cli_overrides(
    compare: CompareArgs,
    fleet: Option<(Option<usize>, Option<usize>)>,
    quiet: bool,
) -> ConfigOverrides {
    let (threads, changed_depth) = fleet.unwrap_or_default();
    let content_diff = if compare.no_content_diff {
        Some(false)
    } else {
        compare.content_diff.then_some(true)
    };

    ConfigOverrides {
        schema: compare.schema,
        exclude_classes: compare.exclude_classes.then_some(true),
        show_resource_diff: compare.show_resource_diff.then_some(true),
        content_diff,
        ignore_parameters: compare.ignore_parameters,
        threads,
        changed_depth,
        output_file: compare.output_file,
        pretty: compare.pretty.then_some(true),
        fail_on_change: compare.fail_on_change.then_some(true),
        quiet: quiet.then_some(true),
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Diff(args) => {
            let overrides = cli_overrides(args.compare, None, cli.quiet);
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }
            cli::run_diff(config, &args.old, &args.new)
        }

        Commands::Fleet(args) => {
            let overrides = cli_overrides(
                args.compare,
                Some((args.threads, args.changed_depth)),
                cli.quiet,
            );
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }
            cli::run_fleet(config, &args.old_dir, &args.new_dir)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "catalog-diff", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => run_config(action, cli.config).map(|()| exit_codes::SUCCESS),
    }
}

fn run_config(action: ConfigAction, explicit: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(explicit.as_deref());
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                dirs::config_dir().map(|p| p.join("catalog-diff").display().to_string()),
                dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order, git root after the first):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in config::file::CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match config::discover_config_file(explicit.as_deref()) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".catalog-diff.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            let content = config::generate_full_example_config();
            std::fs::write(&target, content)
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
        ConfigAction::Schema { output } => {
            let schema =
                config::generate_json_schema().context("failed to serialize config schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides_for(args: &[&str]) -> ConfigOverrides {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Fleet(args) => cli_overrides(
                args.compare,
                Some((args.threads, args.changed_depth)),
                cli.quiet,
            ),
            Commands::Diff(args) => cli_overrides(args.compare, None, cli.quiet),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_default_valued_flags_are_carried() {
        let overrides = overrides_for(&[
            "catalog-diff",
            "fleet",
            "old",
            "new",
            "--schema",
            "current",
            "--threads",
            "10",
            "--changed-depth",
            "10",
        ]);
        assert_eq!(overrides.schema, Some(SchemaGeneration::Current));
        assert_eq!(overrides.threads, Some(10));
        assert_eq!(overrides.changed_depth, Some(10));
    }

    #[test]
    fn test_unset_flags_stay_empty() {
        let overrides = overrides_for(&["catalog-diff", "diff", "a.json", "b.json"]);
        assert_eq!(overrides, ConfigOverrides::default());
    }

    #[test]
    fn test_content_diff_toggle() {
        let off = overrides_for(&["catalog-diff", "diff", "a", "b", "--no-content-diff"]);
        assert_eq!(off.content_diff, Some(false));

        let last_wins = overrides_for(&[
            "catalog-diff",
            "diff",
            "a",
            "b",
            "--no-content-diff",
            "--content-diff",
        ]);
        assert_eq!(last_wins.content_diff, Some(true));
    }
}
