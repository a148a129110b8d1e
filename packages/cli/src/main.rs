#![forbid(unsafe_code)]

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::Level;

use server::config::AppConfig;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Ink gallery operations CLI")]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upsert the records of a legacy JSON snapshot into the database.
    ImportSnapshot {
        file: PathBuf,
        /// Validate and report without writing.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Ingest a `<YEAR>/<name>.<ext>` image tree and create a record per image.
    ImportImages {
        dir: PathBuf,
        /// Publish the created records immediately.
        #[arg(long, default_value_t = false)]
        publish: bool,
    },
    /// Per-year record counts, optionally compared with a snapshot.
    Stats {
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Print machine-readable JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Mint an admin bearer token signed with the configured secret.
    Token {
        #[arg(long, default_value = "admin")]
        subject: String,
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    match command {
        Commands::ImportSnapshot { file, dry_run } => {
            commands::import::import_snapshot_cmd(&config, &file, dry_run).await
        }
        Commands::ImportImages { dir, publish } => {
            commands::import::import_images_cmd(&config, &dir, publish).await
        }
        Commands::Stats { snapshot, json } => {
            commands::stats::stats_cmd(&config, snapshot.as_deref(), json).await
        }
        Commands::Token { subject, days } => commands::token::token_cmd(&config, &subject, days),
    }
}
