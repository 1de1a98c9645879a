//! pet-widget: CLI host for the pet home-screen widget.
//!
//! Widget renderers and schedulers call this binary and read one JSON document
//! from stdout. The game pushes snapshots through `push`.
//!
//! ## Subcommands
//!
//! - `resolve`: Pet state to display now (re-anchors on fresher live data)
//! - `tick`: Scheduled reconcile, same semantics as `resolve`
//! - `refresh`: Manual refresh from the offline baseline only
//! - `push`: Ingest a live snapshot from the game (JSON on stdin)
//! - `reset`: Clear all stored pet data
//! - `status`: Diagnostics without writing anything

mod commands;
mod logging;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::Context;

#[derive(Parser)]
#[command(name = "pet-widget")]
#[command(about = "Offline pet state for home-screen widgets")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to ~/.pet-widget)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the pet state to display
    Resolve,

    /// Periodic reconcile (called by the widget's refresh timer)
    Tick,

    /// Recompute from the offline baseline, ignoring live data
    Refresh,

    /// Ingest a live snapshot (reads JSON from stdin)
    Push,

    /// Clear all stored pet data
    Reset,

    /// Show what a resolve would choose, without writing
    Status,
}

fn main() {
    let cli = Cli::parse();

    let ctx = Context::resolve(cli.root, cli.config);
    let logs_dir = ctx.as_ref().ok().map(|ctx| ctx.storage.logs_dir());
    let _logging_guard = logging::init(logs_dir.as_deref());

    if let Err(e) = ctx.and_then(|ctx| run(&ctx, cli.command)) {
        tracing::error!(error = %e, "pet-widget failed");
        eprintln!("pet-widget: {}", e);
        std::process::exit(1);
    }
}

fn run(ctx: &Context, command: Commands) -> Result<(), commands::CliError> {
    let service = ctx.service()?;
    let mut out = io::stdout().lock();

    match command {
        Commands::Resolve => commands::resolve(&service, &mut out),
        Commands::Tick => commands::tick(&service, &mut out),
        Commands::Refresh => commands::refresh(&service, &mut out),
        Commands::Push => commands::push(&service, &mut io::stdin().lock(), &mut out),
        Commands::Reset => commands::reset(&service, &mut out),
        Commands::Status => commands::status(&service, &mut out),
    }
}
