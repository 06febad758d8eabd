use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ConfigLoader;

pub mod commands;

use self::commands::{AuthorsArgs, FilterArgs, LayoutArgs};

#[derive(Parser, Debug)]
#[command(
    name = "stickyboard",
    version,
    about = "Offline inspector for sticky-note board layouts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file location (takes precedence over STICKYBOARD_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a masonry layout pass over a notes JSON export and print placements
    Layout(LayoutArgs),
    /// Apply the board filters to a notes JSON export and print the view order
    Filter(FilterArgs),
    /// List the distinct authors present in a notes JSON export
    Authors(AuthorsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var("STICKYBOARD_CONFIG", path);
    }

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let loader = ConfigLoader::discover()?;
    let _config = loader.load_or_init()?;

    match cli.command {
        Commands::Layout(args) => commands::layout(args),
        Commands::Filter(args) => commands::filter(args),
        Commands::Authors(args) => commands::authors(args),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
