use anyhow::{bail, Context, Result};
use gly_transcribe::audio::AudioFile;
use gly_transcribe::config::Config;
use gly_transcribe::job::UploadJob;
use gly_transcribe::orchestrator::{endpoints_from_config, UploadOrchestrator};
use std::path::Path;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn print_usage() {
    eprintln!("Usage: gly-transcribe <audio-file> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --duration <secs>   Declared audio duration, sizes the request timeout");
    eprintln!("  --primary <url>     Override the primary transcription host");
    eprintln!("  --fallback <url>    Override the fallback transcription host");
    eprintln!("  --json              Print the full outcome as JSON instead of plain text");
    eprintln!("  -h, --help          Show this help");
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut file_path: Option<String> = None;
    let mut duration: Option<u32> = None;
    let mut primary_override: Option<String> = None;
    let mut fallback_override: Option<String> = None;
    let mut json_output = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--duration" => {
                i += 1;
                let value = args.get(i).context("--duration needs a value")?;
                duration = Some(
                    value
                        .parse()
                        .context("--duration must be a whole number of seconds")?,
                );
            }
            "--primary" => {
                i += 1;
                primary_override = Some(args.get(i).context("--primary needs a URL")?.clone());
            }
            "--fallback" => {
                i += 1;
                fallback_override = Some(args.get(i).context("--fallback needs a URL")?.clone());
            }
            "--json" => json_output = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other if other.starts_with("--") => bail!("unknown option: {}", other),
            other => {
                if file_path.is_some() {
                    bail!("unexpected argument: {}", other);
                }
                file_path = Some(other.to_string());
            }
        }
        i += 1;
    }

    let Some(file_path) = file_path else {
        print_usage();
        bail!("missing audio file path");
    };

    let file = AudioFile::load(Path::new(&file_path), duration)
        .map_err(|e| anyhow::anyhow!(e))?;

    let mut config = Config::from_env();
    if let Some(url) = primary_override {
        config.primary_url = url;
    }
    if let Some(url) = fallback_override {
        config.fallback_url = url;
    }

    tracing::info!(
        file = %file.file_name,
        size_bytes = file.size_bytes(),
        duration_secs = file.duration_secs,
        "starting transcription job"
    );

    let job = UploadJob::new(file);
    let (primary, fallback) = endpoints_from_config(&config);

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let mut orchestrator = UploadOrchestrator::new(primary, fallback).with_progress(progress_tx);

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("cancel requested, aborting upload...");
            let _ = cancel_tx.send(true);
        }
    });

    let progress_task = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            tracing::info!("{}", event);
        }
    });

    let result = orchestrator.run(&job, cancel_rx).await;
    let stats_summary = orchestrator.metrics().summary();
    drop(orchestrator);
    let _ = progress_task.await;

    tracing::info!("endpoint stats: {}", stats_summary);

    let outcome = result?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.transcript);
    }
    tracing::info!(
        elapsed_secs = outcome.elapsed_secs,
        chunks = outcome.chunk_count,
        "transcription complete"
    );

    Ok(())
}
