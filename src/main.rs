mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use rdstail_logs::{TailError, TailOptions, Tailer, resolve_cutoff};
use rdstail_rds::RdsClient;

use config::{FileConfig, Settings};

/// rdstail - Tail RDS database engine logs
#[derive(Parser, Debug)]
#[command(name = "rdstail")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RDS instance identifier
    #[arg(long)]
    instance: Option<String>,

    /// Start from logs after this time: duration (1h, 5m), timestamp
    /// (2006-01-02 15:04:05, UTC) or RFC3339 (2006-01-02T15:04:05Z)
    #[arg(long)]
    since: Option<String>,

    /// Follow log output
    #[arg(short = 'f', long)]
    follow: bool,

    /// AWS region (defaults to the ambient AWS configuration)
    #[arg(long)]
    region: Option<String>,

    /// AWS shared config profile
    #[arg(long)]
    profile: Option<String>,

    /// Seconds between polls in follow mode [default: 5]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Maximum portions downloaded per file per poll, 0 for no limit [default: 10000]
    #[arg(long, value_name = "N")]
    max_portions: Option<usize>,

    /// TOML file with defaults for region, profile, interval_secs and max_portions
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Diagnostics go to stderr, stdout carries the log lines
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let instance = args
        .instance
        .filter(|i| !i.is_empty())
        .ok_or(TailError::MissingInstance)?;

    let cutoff = resolve_cutoff(args.since.as_deref(), Utc::now())?;

    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::merge(
        file_config,
        args.region,
        args.profile,
        args.interval,
        args.max_portions,
    )?;
    tracing::debug!(?settings, "resolved settings");

    let client = RdsClient::from_env(settings.region, settings.profile).await?;

    let options = TailOptions {
        follow: args.follow,
        interval: settings.interval,
        max_portions: settings.max_portions,
    };
    let mut tailer = Tailer::connect(client, &instance, cutoff, options)
        .await
        .context("Failed to detect engine")?;

    let mut out = std::io::stdout().lock();
    tailer.run(&mut out).await?;

    Ok(())
}
