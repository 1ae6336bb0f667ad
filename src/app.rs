//! Run orchestration: one invocation acquires a season's gameweek artifacts,
//! either live from the API or from the archive fallback.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::archive;
use crate::config::Config;
use crate::constants;
use crate::error::AppError;
use crate::fetcher::{
    Bootstrap, MetadataIndex, SourceDecision, bootstrap_url, create_http_client,
    element_summary_url, event_live_url, fetch_json, gameweeks_to_fetch, reconcile, select_source,
};
use crate::fetcher::selector::normalize_season_label;
use crate::writer::{self, OutputLayout};

/// What one run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source: SourceDecision,
    /// Number of gameweek CSV files written (or copied, on the archive path)
    pub files_written: usize,
    /// Gameweeks whose fetch or write failed outright
    pub failed_gameweeks: Vec<u32>,
}

/// Execute one acquisition run end to end.
///
/// Gameweek-level failures on the live path are recorded in the summary and
/// do not stop the remaining gameweeks. Run-level failures (no usable source
/// at all) surface as errors.
pub async fn run(config: &Config, archive_root: Option<&Path>) -> Result<RunSummary, AppError> {
    let season = normalize_season_label(&config.target_season);
    let layout = OutputLayout::new(&config.output_dir, &season);
    layout.ensure().await?;

    let client = create_http_client(config.http_timeout_seconds)?;

    // The metadata fetch is tolerant: a failure downgrades the run to the
    // archive path instead of aborting it.
    let bootstrap_endpoint = bootstrap_url(&config.api_base_url);
    let bootstrap = match fetch_json::<Bootstrap>(
        &client,
        &bootstrap_endpoint,
        config.max_retry_attempts,
    )
    .await
    {
        Ok((bootstrap, body)) => {
            writer::save_raw(&layout.bootstrap_raw_path(), &body).await?;
            Some(bootstrap)
        }
        Err(e) => {
            warn!("Reference metadata fetch failed: {e}");
            None
        }
    };

    match select_source(bootstrap.as_ref(), &season) {
        SourceDecision::Live => {
            // select_source only returns Live when the bootstrap is present
            let bootstrap = bootstrap.as_ref().ok_or_else(|| {
                AppError::config_error("Live source selected without reference metadata")
            })?;
            run_live(config, &client, bootstrap, &layout).await
        }
        SourceDecision::Archive => run_archive(config, archive_root, &season, &layout).await,
    }
}

/// Live path: fetch each gameweek from the API, reconcile, write CSVs.
async fn run_live(
    config: &Config,
    client: &reqwest::Client,
    bootstrap: &Bootstrap,
    layout: &OutputLayout,
) -> Result<RunSummary, AppError> {
    let gameweeks = clamp_gameweeks(
        gameweeks_to_fetch(bootstrap),
        config.start_gameweek,
        config.end_gameweek,
    );
    info!(
        "Fetching {} gameweek(s) live ({}..={})",
        gameweeks.len(),
        config.start_gameweek,
        config.end_gameweek
    );

    let index = MetadataIndex::new(bootstrap);
    let mut files_written = 0usize;
    let mut failed_gameweeks = Vec::new();

    for (i, &gameweek) in gameweeks.iter().enumerate() {
        if i > 0 && config.pacing_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.pacing_ms)).await;
        }

        match fetch_gameweek(config, client, &index, layout, gameweek).await {
            Ok(true) => files_written += 1,
            Ok(false) => {}
            Err(e) => {
                error!("Gameweek {gameweek} failed: {e}");
                failed_gameweeks.push(gameweek);
            }
        }
    }

    if config.fetch_player_history {
        fetch_player_histories(config, client, bootstrap, layout).await;
    }

    Ok(RunSummary {
        source: SourceDecision::Live,
        files_written,
        failed_gameweeks,
    })
}

/// Optional per-player history capture: one element-summary payload per
/// player in the reference metadata, saved raw-only. A per-player failure is
/// logged and tolerated; the season artifacts are already on disk here.
async fn fetch_player_histories(
    config: &Config,
    client: &reqwest::Client,
    bootstrap: &Bootstrap,
    layout: &OutputLayout,
) {
    info!(
        "Fetching element summaries for {} player(s)",
        bootstrap.elements.len()
    );

    for (i, element) in bootstrap.elements.iter().enumerate() {
        if i > 0 && config.pacing_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.pacing_ms)).await;
        }

        let url = element_summary_url(&config.api_base_url, element.id);
        match fetch_json::<Value>(client, &url, config.max_retry_attempts).await {
            Ok((_, body)) => {
                let path = layout.element_summary_raw_path(element.id);
                if let Err(e) = writer::save_raw(&path, &body).await {
                    warn!(
                        "Failed to save element summary for player {}: {e}",
                        element.id
                    );
                }
            }
            Err(e) => warn!(
                "Failed to fetch element summary for player {}: {e}",
                element.id
            ),
        }
    }
}

/// Fetch, reconcile, and persist one gameweek. Returns whether a CSV was
/// written; a payload with zero usable rows writes nothing.
async fn fetch_gameweek(
    config: &Config,
    client: &reqwest::Client,
    index: &MetadataIndex<'_>,
    layout: &OutputLayout,
    gameweek: u32,
) -> Result<bool, AppError> {
    let url = event_live_url(&config.api_base_url, gameweek);
    let (payload, body) = fetch_json::<Value>(client, &url, config.max_retry_attempts).await?;
    writer::save_raw(&layout.gameweek_raw_path(gameweek), &body).await?;

    let fetched_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let rows = reconcile(&payload, index, gameweek, &fetched_at)?;
    if rows.is_empty() {
        warn!("Gameweek {gameweek} yielded no rows; skipping CSV");
        return Ok(false);
    }

    writer::write_rows(&layout.gameweek_csv_path(gameweek), &rows)?;
    Ok(true)
}

/// Archive path: clone if needed, locate candidates, copy them through.
async fn run_archive(
    config: &Config,
    archive_root: Option<&Path>,
    season: &str,
    layout: &OutputLayout,
) -> Result<RunSummary, AppError> {
    let root: PathBuf = match archive_root {
        Some(root) => root.to_path_buf(),
        None => {
            let dest = PathBuf::from(constants::archive::DEFAULT_CLONE_DIR);
            archive::clone_archive(&config.archive_repo_url, &dest).await?;
            dest
        }
    };

    let candidates = archive::locate(&root, season);
    if candidates.is_empty() {
        return Err(AppError::archive_not_found(
            root.display().to_string(),
            season,
        ));
    }

    let copied = writer::copy_candidates(&candidates, &layout.csv_dir).await?;
    info!("Copied {copied} archive file(s) for season {season}");

    Ok(RunSummary {
        source: SourceDecision::Archive,
        files_written: copied,
        failed_gameweeks: Vec::new(),
    })
}

/// Intersect the metadata-derived gameweek set with the configured range.
fn clamp_gameweeks(gameweeks: Vec<u32>, start: u32, end: u32) -> Vec<u32> {
    gameweeks
        .into_iter()
        .filter(|gw| (start..=end).contains(gw))
        .collect()
}
