// Runs one counting session against a recorded pose stream and renders it in the terminal

use anyhow::{anyhow, Context};
use clap::Parser;
use repcount_lib::core::config::Config;
use repcount_lib::core::rep_counter::RepCounter;
use repcount_lib::platform::{ReplayMode, ReplayOracle, SyntheticFrameSource, TerminalDisplay};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "repcount", version, about = "Count repetitions from a pose stream")]
struct Args {
    /// Recorded pose stream to replay (JSON array of poses)
    #[arg(long)]
    replay: PathBuf,

    /// Configuration file (defaults to ~/.repcount/config/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the session length
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Override the exercise name shown in the count
    #[arg(long)]
    label: Option<String>,

    /// Simulated inference time per frame
    #[arg(long, default_value_t = 66)]
    latency_ms: u64,

    /// Keep returning the last recorded pose instead of looping
    #[arg(long)]
    hold_last: bool,

    /// Print the session summary as JSON
    #[arg(long)]
    summary_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    if let Some(secs) = args.duration_secs {
        config.set_session_duration_secs(secs);
    }
    if let Some(label) = args.label {
        config.exercise_label = label;
    }

    let mode = if args.hold_last { ReplayMode::HoldLast } else { ReplayMode::Loop };
    let oracle = ReplayOracle::from_file(&args.replay, mode)
        .context("Failed to load pose recording")?
        .with_latency(Duration::from_millis(args.latency_ms));

    let counter = Arc::new(
        RepCounter::new(
            config,
            Box::new(SyntheticFrameSource::new(224, 224)),
            Box::new(oracle),
            Box::new(TerminalDisplay::new()),
        )
        .await?,
    );

    let on_interrupt = counter.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let summary = counter.run_session().await?;
    println!();

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
