mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client::{settings, AppContext};
use tracing_subscriber::EnvFilter;

use commands::Command;

/// Postboard - post and browse short posts from the terminal
#[derive(Parser, Debug)]
#[command(name = "postboard")]
#[command(version, about)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Path to configuration file (default: ./postboard.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Command::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let app = AppContext::open(&config)?;
    app.initialize().await;
    if let Some(error) = app.error() {
        tracing::warn!("{error}");
    }

    let mut stdout = io::stdout().lock();
    commands::run(&app, cli.command, &mut stdout).await
}
