// src/main.rs
mod app;
mod archive;
mod cli;
mod config;
mod constants;
mod error;
mod fetcher;
mod writer;

use clap::Parser;
use cli::{Args, is_config_only_mode};
use config::Config;
use error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Handle configuration operations before any logging is set up so the
    // output stays plain
    if is_config_only_mode(&args) {
        return handle_config_ops(args).await;
    }

    // Try to load config to get log file path if specified
    let config_log_path = Config::load()
        .await
        .ok()
        .and_then(|config| config.log_file_path);

    // Set up logging to both console and file
    let custom_log_path = args.log_file.as_ref().or(config_log_path.as_ref());
    let (log_dir, log_file_name) = match custom_log_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path.parent().unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("fpl_gameweeks.log");
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), "fpl_gameweeks.log".to_string()),
    };

    // Create log directory if it doesn't exist
    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    // Set up a rolling file appender that creates a new log file each day
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // Create a non-blocking writer for the file appender
    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(stdout)
                .with_ansi(true)
                .with_filter(
                    EnvFilter::from_default_env()
                        .add_directive("fpl_gameweeks=info".parse().unwrap()),
                ),
        )
        .with(
            fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    EnvFilter::from_default_env()
                        .add_directive("fpl_gameweeks=info".parse().unwrap()),
                ),
        )
        .init();

    let log_file_path = format!("{log_dir}/{log_file_name}");
    tracing::info!("Logs are being written to: {log_file_path}");

    // Load config first to fail early if there's an issue, then apply
    // per-run overrides from the command line
    let mut config = Config::load().await?;

    if let Some(season) = args.season {
        config.target_season = season;
    }
    if let Some(start) = args.start_gameweek {
        config.start_gameweek = start;
    }
    if let Some(end) = args.end_gameweek {
        config.end_gameweek = end;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(pacing_ms) = args.pacing_ms {
        config.pacing_ms = pacing_ms;
    }
    if let Some(archive_repo) = args.archive_repo {
        config.archive_repo_url = archive_repo;
    }
    if args.fetch_player_history {
        config.fetch_player_history = true;
    }
    config.validate()?;

    let archive_root = args.archive_root.as_ref().map(Path::new);
    let summary = app::run(&config, archive_root).await?;

    tracing::info!(
        "Run complete: source={:?}, files written={}",
        summary.source,
        summary.files_written
    );

    if !summary.failed_gameweeks.is_empty() {
        return Err(AppError::gameweeks_failed(summary.failed_gameweeks));
    }

    Ok(())
}

/// Configuration-only invocations: list or update settings, then exit.
async fn handle_config_ops(args: Args) -> Result<(), AppError> {
    if args.list_config {
        Config::display().await?;
        return Ok(());
    }

    let mut config = Config::load().await.unwrap_or_default();

    if let Some(new_api_base_url) = args.new_api_base_url {
        config.api_base_url = new_api_base_url;
    }

    if let Some(new_log_path) = args.new_log_file_path {
        config.log_file_path = Some(new_log_path);
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.save().await?;
    println!("Config updated successfully!");
    Ok(())
}
