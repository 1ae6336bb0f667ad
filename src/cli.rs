use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// FPL Gameweek Fetcher
///
/// Fetches per-gameweek player data for a Fantasy Premier League season and
/// flattens it into one CSV per gameweek. When the API reports a different
/// current season than the configured target, the data is sourced from a
/// cloned community archive repository instead.
///
/// Each run is a finite batch: gameweeks are fetched sequentially with a
/// courtesy pacing delay, raw JSON payloads are kept alongside the CSVs, and
/// re-running overwrites per-gameweek artifacts deterministically.
#[derive(Parser, Debug)]
#[command(author = "Daniel Baker", version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Target season label, e.g. "2025-26". Overrides the configured value.
    #[arg(long = "season", short = 's', help_heading = "Acquisition")]
    pub season: Option<String>,

    /// First gameweek to fetch (inclusive). Overrides the configured value.
    #[arg(long = "start", help_heading = "Acquisition")]
    pub start_gameweek: Option<u32>,

    /// Last gameweek to fetch (inclusive). Overrides the configured value.
    #[arg(long = "end", help_heading = "Acquisition")]
    pub end_gameweek: Option<u32>,

    /// Output root directory for raw and CSV artifacts.
    #[arg(long = "outdir", short = 'o', help_heading = "Acquisition")]
    pub output_dir: Option<String>,

    /// Delay between gameweek requests in milliseconds.
    #[arg(long = "pacing-ms", help_heading = "Acquisition")]
    pub pacing_ms: Option<u64>,

    /// Also fetch each player's element-summary history (slower).
    #[arg(long = "fetch-player-history", help_heading = "Acquisition")]
    pub fetch_player_history: bool,

    /// Archive repository URL used for historical seasons.
    #[arg(long = "repo", help_heading = "Archive Fallback")]
    pub archive_repo: Option<String>,

    /// Use an existing archive checkout instead of cloning.
    #[arg(long = "archive-root", help_heading = "Archive Fallback")]
    pub archive_root: Option<String>,

    /// Update API base URL in config.
    #[arg(
        long = "set-api-base",
        help_heading = "Configuration",
        value_name = "API_BASE_URL"
    )]
    pub new_api_base_url: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config, reverting to the default location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Specify a custom log file path for this run only.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

/// Whether the invocation only manages configuration and performs no fetching
pub fn is_config_only_mode(args: &Args) -> bool {
    args.list_config
        || args.new_api_base_url.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}
