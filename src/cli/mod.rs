use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{ConfigLoader, CONFIG_ENV};

pub mod commands;

use self::commands::{ListArgs, RenderArgs};

#[derive(Parser, Debug)]
#[command(
    name = "noteline",
    version,
    about = "Date-bucketed notes list and markdown reader for the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over NOTELINE_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error, off).
    /// Defaults to info, or off while the TUI owns the terminal.
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive TUI over the sample notes (default)
    Tui,
    /// Print the date-separated note list, optionally filtered by title
    List(ListArgs),
    /// Parse markdown and print the rendered blocks
    Render(RenderArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }

    let command = cli.command.unwrap_or(Commands::Tui);
    let level = cli.log_level.unwrap_or_else(|| match command {
        Commands::Tui => "off".to_string(),
        _ => "info".to_string(),
    });
    init_tracing(&level).with_context(|| format!("initialising logging at level {level}"))?;

    let loader = ConfigLoader::discover()?;
    let config = Arc::new(loader.load_or_init()?);
    tracing::debug!(path = %loader.paths().config_file.display(), "loaded config");

    match command {
        Commands::Tui => commands::run_tui(config),
        Commands::List(args) => commands::list_notes(&config, args),
        Commands::Render(args) => commands::render_markdown(&config, args),
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
