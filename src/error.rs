use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("Retries exhausted after {attempts} attempts for: {url} - {message}")]
    RetriesExhausted {
        attempts: u32,
        url: String,
        message: String,
    },

    // Data parsing and validation errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("Gameweek payload is not a sequence of entries: {0}")]
    Schema(String),

    // Archive fallback errors
    #[error("No gameweek data found in archive at {root} for season {season}")]
    ArchiveNotFound { root: String, season: String },

    #[error("Archive clone failed for {repo}: {message}")]
    ArchiveClone { repo: String, message: String },

    #[error("{count} gameweek(s) failed: {gameweeks:?}")]
    GameweeksFailed { count: usize, gameweeks: Vec<u32> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a retries-exhausted error recording the final underlying cause
    pub fn retries_exhausted(
        attempts: u32,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RetriesExhausted {
            attempts,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a schema error for a payload that is not iterable as entries
    pub fn schema_error(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create an archive not found error
    pub fn archive_not_found(root: impl Into<String>, season: impl Into<String>) -> Self {
        Self::ArchiveNotFound {
            root: root.into(),
            season: season.into(),
        }
    }

    /// Create an archive clone error
    pub fn archive_clone(repo: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArchiveClone {
            repo: repo.into(),
            message: message.into(),
        }
    }

    /// Create a run-summary error for gameweeks that failed outright
    pub fn gameweeks_failed(gameweeks: Vec<u32>) -> Self {
        Self::GameweeksFailed {
            count: gameweeks.len(),
            gameweeks,
        }
    }

    /// Check if error is retryable within the fetch loop (network issues,
    /// server errors, rate limits). Parse errors are never retryable since
    /// a structurally invalid response will not fix itself on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiRateLimit { .. }
        )
    }
}
