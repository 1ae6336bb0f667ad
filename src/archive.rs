//! Archive fallback: locate gameweek CSVs inside a cloned community archive
//! whose internal layout is not under our control.
//!
//! Location runs an ordered list of strategies and stops at the first one
//! that yields candidates. Conventional season-labeled layouts are probed
//! first; the recursive scan comes last because it is O(archive size) and
//! offers no ordering guarantee among matches. `locate` itself never fails,
//! an empty result leaves the escalation decision to the caller.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::archive;
use crate::error::AppError;
use crate::fetcher::selector::normalize_season_label;

/// A discovered file believed to hold gameweek data for the target season.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchiveCandidate {
    pub path: PathBuf,
}

/// One probing approach over the archive tree.
trait LocateStrategy {
    fn name(&self) -> &'static str;
    fn attempt(&self, root: &Path, season: &str) -> Vec<ArchiveCandidate>;
}

/// Probe the small set of conventional season-labeled layouts.
struct ConventionalLayouts;

impl ConventionalLayouts {
    /// Season directories archives have been observed to use, in priority order.
    fn season_dirs(root: &Path, season: &str) -> Vec<PathBuf> {
        let stripped: String = season.chars().filter(|c| *c != '-').collect();
        vec![
            root.join("data").join(season),
            root.join("data").join(&stripped),
            root.join("season").join(season),
            root.join(season),
            root.join("seasons").join(season),
        ]
    }

    /// Sub-directories of a season folder that conventionally hold per-GW files.
    fn gameweek_dirs(season_dir: &Path) -> Vec<PathBuf> {
        vec![
            season_dir.join("gws"),
            season_dir.join("data").join("gws"),
            season_dir.join("gw"),
            season_dir.to_path_buf(),
        ]
    }
}

impl LocateStrategy for ConventionalLayouts {
    fn name(&self) -> &'static str {
        "conventional season layouts"
    }

    fn attempt(&self, root: &Path, season: &str) -> Vec<ArchiveCandidate> {
        for season_dir in Self::season_dirs(root, season) {
            if !season_dir.is_dir() {
                continue;
            }
            debug!("Found season directory at {}", season_dir.display());

            for gw_dir in Self::gameweek_dirs(&season_dir) {
                let mut found = list_gameweek_csvs(&gw_dir);
                if !found.is_empty() {
                    found.sort();
                    return found;
                }
            }
        }
        Vec::new()
    }
}

/// Last-resort bounded recursive walk over the whole archive.
struct RecursiveScan;

impl LocateStrategy for RecursiveScan {
    fn name(&self) -> &'static str {
        "recursive scan"
    }

    fn attempt(&self, root: &Path, _season: &str) -> Vec<ArchiveCandidate> {
        let mut found: Vec<ArchiveCandidate> = WalkDir::new(root)
            .max_depth(archive::MAX_SCAN_DEPTH)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_gameweek_csv(e.file_name().to_string_lossy().as_ref()))
            .map(|e| ArchiveCandidate {
                path: e.into_path(),
            })
            .collect();
        found.sort();
        found
    }
}

/// Loose per-gameweek file name match, case-insensitive prefix and suffix.
fn is_gameweek_csv(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.starts_with("gw") && lower.ends_with(".csv")
}

fn list_gameweek_csvs(dir: &Path) -> Vec<ArchiveCandidate> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .filter(|e| is_gameweek_csv(e.file_name().to_string_lossy().as_ref()))
        .map(|e| ArchiveCandidate { path: e.path() })
        .collect()
}

/// Search the archive root for the target season's gameweek files.
///
/// Strategies run in fixed priority order, stopping at the first non-empty
/// result set. All matches of the winning strategy are returned; the caller
/// reconciles duplicates rather than this function guessing which one is
/// authoritative. Returns an empty set when nothing matched anywhere.
pub fn locate(root: &Path, season: &str) -> Vec<ArchiveCandidate> {
    let season = normalize_season_label(season);
    let strategies: [&dyn LocateStrategy; 2] = [&ConventionalLayouts, &RecursiveScan];

    for strategy in strategies {
        let candidates = strategy.attempt(root, &season);
        if !candidates.is_empty() {
            info!(
                "Archive strategy '{}' found {} candidate(s)",
                strategy.name(),
                candidates.len()
            );
            return candidates;
        }
        debug!("Archive strategy '{}' found nothing", strategy.name());
    }

    warn!(
        "No gameweek candidates found under {} for season {season}",
        root.display()
    );
    Vec::new()
}

/// Shallow-clone the archive repository unless the destination already exists.
/// The clone itself is incidental plumbing; a failure here escalates because
/// the archive is the last fallback tier.
pub async fn clone_archive(repo_url: &str, dest: &Path) -> Result<(), AppError> {
    if dest.exists() {
        info!("Archive already present at {}", dest.display());
        return Ok(());
    }

    info!("Cloning {repo_url} into {}", dest.display());
    let output = tokio::process::Command::new("git")
        .args(["clone", "--depth", "1", repo_url])
        .arg(dest)
        .output()
        .await
        .map_err(|e| AppError::archive_clone(repo_url, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::archive_clone(repo_url, stderr.trim().to_string()));
    }

    Ok(())
}
