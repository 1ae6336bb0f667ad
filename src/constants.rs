//! Application-wide constants and configuration values
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and make the codebase more configurable.

#![allow(dead_code)]

/// Base URL of the public FPL API
pub const DEFAULT_API_BASE_URL: &str = "https://fantasy.premierleague.com/api";

/// Default timeout for a single HTTP request attempt in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 20;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Retry configuration
pub mod retry {
    /// Maximum number of attempts per resource (first try included)
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Upper bound a configured attempt count may take
    pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

    /// Base delay for exponential backoff in seconds.
    /// The wait before attempt N+1 is BASE_DELAY_SECONDS * 2^(N-1),
    /// i.e. 1, 2, 4 seconds for the default three attempts.
    pub const BASE_DELAY_SECONDS: u64 = 1;

    /// Ceiling on any single backoff wait in seconds
    pub const MAX_DELAY_SECONDS: u64 = 60;
}

/// Season and gameweek bounds
pub mod season {
    /// Season label the pipeline targets by default
    pub const DEFAULT_TARGET_SEASON: &str = "2025-26";

    /// First gameweek of a season
    pub const FIRST_GAMEWEEK: u32 = 1;

    /// Gameweek count of a standard 20-team season, used as a conservative
    /// fallback when reference metadata carries no events at all
    pub const DEFAULT_GAMEWEEK_COUNT: u32 = 38;
}

/// Pacing between consecutive API requests
pub mod pacing {
    /// Default courtesy delay between gameweek fetches (milliseconds)
    pub const DEFAULT_DELAY_MS: u64 = 500;
}

/// Archive fallback configuration
pub mod archive {
    /// Default community archive repository for historical seasons
    pub const DEFAULT_REPO_URL: &str = "https://github.com/vaastav/Fantasy-Premier-League.git";

    /// Directory the archive repo is cloned into when no root is supplied
    pub const DEFAULT_CLONE_DIR: &str = "./_fpl_repo_clone";

    /// Depth bound for the recursive fallback scan of the archive tree
    pub const MAX_SCAN_DEPTH: usize = 12;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API base URL override
    pub const API_BASE_URL: &str = "FPL_GW_API_BASE_URL";

    /// Environment variable for target season override
    pub const TARGET_SEASON: &str = "FPL_GW_TARGET_SEASON";

    /// Environment variable for output directory override
    pub const OUTPUT_DIR: &str = "FPL_GW_OUTPUT_DIR";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "FPL_GW_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "FPL_GW_HTTP_TIMEOUT";
}
