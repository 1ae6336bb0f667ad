use crate::constants;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod validation;

use validation::validate_config;

/// Root of this application's files under the platform config directory
/// (e.g. ~/.config on Linux), with the current directory as a last resort.
fn app_config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fpl_gameweeks")
}

fn config_file_path() -> String {
    app_config_root()
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

fn log_dir_path() -> String {
    app_config_root().join("logs").to_string_lossy().to_string()
}

/// Configuration structure for the acquisition pipeline.
/// Handles loading, saving, and managing all scalar run settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the FPL API, including the https:// prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Season label the run targets, hyphen-separated (e.g. "2025-26").
    #[serde(default = "default_target_season")]
    pub target_season: String,
    /// Root directory gameweek artifacts are written under.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// First gameweek to fetch (inclusive).
    #[serde(default = "default_start_gameweek")]
    pub start_gameweek: u32,
    /// Last gameweek to fetch (inclusive).
    #[serde(default = "default_end_gameweek")]
    pub end_gameweek: u32,
    /// Courtesy delay between gameweek requests, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    /// Maximum fetch attempts per resource.
    #[serde(default = "default_max_attempts")]
    pub max_retry_attempts: u32,
    /// HTTP timeout in seconds for a single request attempt.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Archive repository cloned when the API does not expose the target season.
    #[serde(default = "default_archive_repo_url")]
    pub archive_repo_url: String,
    /// Also capture each player's element-summary history on the live path.
    #[serde(default)]
    pub fetch_player_history: bool,
    /// Path to the log file. If not specified, logs go to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_api_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

fn default_target_season() -> String {
    constants::season::DEFAULT_TARGET_SEASON.to_string()
}

fn default_output_dir() -> String {
    "./output".to_string()
}

fn default_start_gameweek() -> u32 {
    constants::season::FIRST_GAMEWEEK
}

fn default_end_gameweek() -> u32 {
    constants::season::DEFAULT_GAMEWEEK_COUNT
}

fn default_pacing_ms() -> u64 {
    constants::pacing::DEFAULT_DELAY_MS
}

fn default_max_attempts() -> u32 {
    constants::retry::MAX_ATTEMPTS
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_archive_repo_url() -> String {
    constants::archive::DEFAULT_REPO_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            target_season: default_target_season(),
            output_dir: default_output_dir(),
            start_gameweek: default_start_gameweek(),
            end_gameweek: default_end_gameweek(),
            pacing_ms: default_pacing_ms(),
            max_retry_attempts: default_max_attempts(),
            http_timeout_seconds: default_http_timeout(),
            archive_repo_url: default_archive_repo_url(),
            fetch_player_history: false,
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, defaults are used and written out.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `FPL_GW_API_BASE_URL` - Override API base URL
    /// - `FPL_GW_TARGET_SEASON` - Override target season label
    /// - `FPL_GW_OUTPUT_DIR` - Override output root directory
    /// - `FPL_GW_LOG_FILE` - Override log file path
    /// - `FPL_GW_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    pub async fn load() -> Result<Self, AppError> {
        let config_path = config_file_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save().await?;
            config
        };

        // Override with environment variables if present
        if let Ok(api_base_url) = std::env::var(constants::env_vars::API_BASE_URL) {
            config.api_base_url = api_base_url;
        }

        if let Ok(target_season) = std::env::var(constants::env_vars::TARGET_SEASON) {
            config.target_season = target_season;
        }

        if let Ok(output_dir) = std::env::var(constants::env_vars::OUTPUT_DIR) {
            config.output_dir = output_dir;
        }

        if let Ok(log_file_path) = std::env::var(constants::env_vars::LOG_FILE) {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(constants::env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(
            &self.api_base_url,
            &self.target_season,
            self.start_gameweek,
            self.end_gameweek,
            self.max_retry_attempts,
            &self.log_file_path,
        )
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = config_file_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        config_file_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = config_file_path();
        let log_dir = log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Base URL:");
            println!("{}", config.api_base_url);
            println!("────────────────────────────────────");
            println!("Target Season:");
            println!("{}", config.target_season);
            println!("────────────────────────────────────");
            println!("Output Directory:");
            println!("{}", config.output_dir);
            println!("────────────────────────────────────");
            println!("Gameweek Range:");
            println!("{}..{}", config.start_gameweek, config.end_gameweek);
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/fpl_gameweeks.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and ensures the
    /// API base URL carries the https:// prefix.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let api_base_url = if !self.api_base_url.starts_with("https://") {
            format!(
                "https://{}",
                self.api_base_url.trim_start_matches("http://")
            )
        } else {
            self.api_base_url.clone()
        };
        let content = toml::to_string_pretty(&Config {
            api_base_url,
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path (for testing).
    #[allow(dead_code)] // Used in tests
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
