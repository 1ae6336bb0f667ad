//! Source selection: decide once per run whether the target season is
//! obtainable live from the API or must come from the archive fallback.

use tracing::{info, warn};

use crate::constants::season;
use crate::fetcher::models::Bootstrap;

/// The live-vs-archive branch of control for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDecision {
    /// The API currently serves the target season
    Live,
    /// Historical season, or the metadata fetch failed; use the archive
    Archive,
}

/// Normalize a season label's separators so "2025/26" and "2025-26" compare
/// equal. The comparison itself stays case-sensitive.
pub fn normalize_season_label(label: &str) -> String {
    label.replace('/', "-").trim().to_string()
}

/// Decide the data source by comparing the API's self-reported season label
/// against the configured target.
///
/// A missing bootstrap (the metadata fetch failed outright) and a missing or
/// mismatched label all conservatively select the archive path.
pub fn select_source(bootstrap: Option<&Bootstrap>, target_season: &str) -> SourceDecision {
    let Some(bootstrap) = bootstrap else {
        warn!("Reference metadata unavailable; falling back to the archive path");
        return SourceDecision::Archive;
    };

    match bootstrap.season_label() {
        Some(label) if normalize_season_label(label) == target_season => {
            info!("API season matches target {target_season}; taking the live path");
            SourceDecision::Live
        }
        Some(label) => {
            info!(
                "API season '{label}' does not match target '{target_season}'; taking the archive path"
            );
            SourceDecision::Archive
        }
        None => {
            warn!("Reference metadata carries no season label; taking the archive path");
            SourceDecision::Archive
        }
    }
}

/// The sorted set of gameweek ids present in reference metadata.
///
/// Metadata with no events at all yields the conservative default range
/// (1..=38) rather than aborting the run.
pub fn gameweeks_to_fetch(bootstrap: &Bootstrap) -> Vec<u32> {
    let mut ids: Vec<u32> = bootstrap.events.iter().filter_map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        warn!(
            "No events in reference metadata; defaulting to gameweeks {}..={}",
            season::FIRST_GAMEWEEK,
            season::DEFAULT_GAMEWEEK_COUNT
        );
        (season::FIRST_GAMEWEEK..=season::DEFAULT_GAMEWEEK_COUNT).collect()
    } else {
        ids
    }
}
