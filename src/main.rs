//! framedeps CLI entry point

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod selftest;

#[derive(Parser)]
#[command(name = "framedeps")]
#[command(about = "Dependency graph of the system's framework bundles, as Graphviz text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bundle root to scan; repeat for several (replaces configured roots)
    #[arg(long = "root", global = true)]
    roots: Vec<PathBuf>,

    /// Cache file location
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Neither read nor write the cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the graph to stdout (the default)
    Render,
    /// Run the built-in self-test suite
    Selftest,
    /// Remove the cache file
    Clear,
    /// Any other argument runs the self-test suite as well
    #[command(external_subcommand)]
    Other(Vec<OsString>),
}

fn init_logging(verbose: bool) {
    // Logs go to stderr; stdout carries the graph.
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "framedeps={log_level},framedeps_core={log_level},framedeps_inspect={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            // Anything the parser rejects still counts as "an argument".
            _ => {
                init_logging(false);
                tracing::debug!("Arguments not recognized ({:?}), running self-tests", e.kind());
                return selftest::run();
            }
        },
    };

    init_logging(cli.verbose);
    tracing::debug!("framedeps v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        None | Some(Commands::Render) => {
            let config = commands::resolve_config(
                cli.config.as_deref(),
                cli.roots,
                cli.cache,
                cli.no_cache,
            )?;
            commands::render(&config)
        }
        Some(Commands::Clear) => {
            let config = commands::resolve_config(
                cli.config.as_deref(),
                cli.roots,
                cli.cache,
                cli.no_cache,
            )?;
            commands::clear(&config)
        }
        Some(Commands::Selftest) => selftest::run(),
        Some(Commands::Other(args)) => {
            tracing::debug!("Unrecognized arguments {:?}, running self-tests", args);
            selftest::run()
        }
    }
}
