//! lcache - Command line tool for a local-cache store.
//!
//! Commands:
//! - `lcache get` - Read a cached value
//! - `lcache set` - Write a value with an expiration
//! - `lcache rm` - Delete a value
//! - `lcache ledger` - List tracked expirations
//! - `lcache purge` - Delete values whose expiration has passed
//! - `lcache config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, GetArgs, RmArgs, SetArgs};

/// lcache - Expiring key-value cache over a durable store and cookies
#[derive(Parser)]
#[command(name = "lcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a cached value
    Get(GetArgs),

    /// Write a value
    Set(SetArgs),

    /// Delete a value
    Rm(RmArgs),

    /// List tracked expirations in the durable store
    Ledger,

    /// Delete durable values whose expiration has passed
    Purge,

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Get(args) => commands::get::run(args, &ctx),
        Commands::Set(args) => commands::set::run(args, &ctx),
        Commands::Rm(args) => commands::rm::run(args, &ctx),
        Commands::Ledger => commands::ledger::run(&ctx),
        Commands::Purge => commands::purge::run(&ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
