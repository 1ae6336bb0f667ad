//! Artifact output: per-gameweek CSVs with the fixed canonical column set,
//! raw JSON captures, and the output directory layout.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::archive::ArchiveCandidate;
use crate::error::AppError;
use crate::fetcher::reconcile::CanonicalRow;

/// Directory layout of one run's output: `<root>/<season>/{raw,csv}`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub season_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub csv_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(output_root: &str, season: &str) -> Self {
        let season_dir = Path::new(output_root).join(season);
        Self {
            raw_dir: season_dir.join("raw"),
            csv_dir: season_dir.join("csv"),
            season_dir,
        }
    }

    /// Create the output directories if they do not exist yet.
    pub async fn ensure(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.raw_dir).await?;
        tokio::fs::create_dir_all(&self.csv_dir).await?;
        Ok(())
    }

    pub fn bootstrap_raw_path(&self) -> PathBuf {
        self.raw_dir.join("bootstrap-static.json")
    }

    pub fn gameweek_raw_path(&self, gameweek: u32) -> PathBuf {
        self.raw_dir.join(format!("event_{gameweek}_live.json"))
    }

    pub fn element_summary_raw_path(&self, player_id: i64) -> PathBuf {
        self.raw_dir
            .join(format!("element_{player_id}_summary.json"))
    }

    pub fn gameweek_csv_path(&self, gameweek: u32) -> PathBuf {
        self.csv_dir.join(format!("gw_{gameweek}_players.csv"))
    }
}

/// Persist a raw payload capture verbatim, for auditability and replay.
pub async fn save_raw(path: &Path, body: &str) -> Result<(), AppError> {
    tokio::fs::write(path, body).await?;
    debug!("Saved raw payload to {}", path.display());
    Ok(())
}

/// Write canonical rows as one CSV. The header order is the `CanonicalRow`
/// field order; absent optional fields serialize as empty cells. Zero rows
/// write no file at all. Overwrites any previous artifact for the gameweek.
pub fn write_rows(path: &Path, rows: &[CanonicalRow]) -> Result<usize, AppError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Copy located archive candidates into the CSV output directory, keeping
/// their file names. Later candidates overwrite earlier ones of the same
/// name; discovery order is deterministic, so the result is too.
pub async fn copy_candidates(
    candidates: &[ArchiveCandidate],
    csv_dir: &Path,
) -> Result<usize, AppError> {
    let mut copied = 0usize;
    for candidate in candidates {
        let Some(file_name) = candidate.path.file_name() else {
            continue;
        };
        let dest = csv_dir.join(file_name);
        tokio::fs::copy(&candidate.path, &dest).await?;
        debug!("Copied {} -> {}", candidate.path.display(), dest.display());
        copied += 1;
    }
    Ok(copied)
}
