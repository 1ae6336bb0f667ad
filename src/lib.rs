//! Fantasy Premier League Gameweek Fetcher Library
//!
//! This library acquires per-gameweek player data for a Fantasy Premier
//! League season and flattens heterogeneous API payloads into one canonical
//! CSV per gameweek. Historical seasons fall back to a cloned community
//! archive repository.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fpl_gameweeks::app;
//! use fpl_gameweeks::config::Config;
//! use fpl_gameweeks::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config {
//!         target_season: "2025-26".to_string(),
//!         start_gameweek: 1,
//!         end_gameweek: 5,
//!         ..Config::default()
//!     };
//!
//!     let summary = app::run(&config, None).await?;
//!     println!(
//!         "{} file(s) written, {} gameweek(s) failed",
//!         summary.files_written,
//!         summary.failed_gameweeks.len()
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod archive;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod writer;

// Re-export commonly used types for convenience
pub use app::{RunSummary, run};
pub use archive::{ArchiveCandidate, clone_archive, locate};
pub use config::Config;
pub use error::AppError;
pub use fetcher::{
    Bootstrap, CanonicalRow, MetadataIndex, SourceDecision, fetch_json, gameweeks_to_fetch,
    reconcile, select_source,
};
pub use writer::OutputLayout;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
