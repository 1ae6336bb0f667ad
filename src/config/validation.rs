use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API base URL cannot be empty and must look like a URL or domain
/// - Target season label cannot be empty
/// - Gameweek range must satisfy 1 <= start <= end <= 38
/// - Retry attempt count must satisfy 1 <= attempts <= 10
/// - If log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(
    api_base_url: &str,
    target_season: &str,
    start_gameweek: u32,
    end_gameweek: u32,
    max_retry_attempts: u32,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    if api_base_url.is_empty() {
        return Err(AppError::config_error("API base URL cannot be empty"));
    }

    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        // If it doesn't start with a protocol, it should at least look like a domain
        if !api_base_url.contains('.') && !api_base_url.starts_with("localhost") {
            return Err(AppError::config_error(
                "API base URL must be a valid URL or domain name",
            ));
        }
    }

    if target_season.trim().is_empty() {
        return Err(AppError::config_error("Target season cannot be empty"));
    }

    if start_gameweek < crate::constants::season::FIRST_GAMEWEEK {
        return Err(AppError::config_error(format!(
            "Start gameweek must be at least {}",
            crate::constants::season::FIRST_GAMEWEEK
        )));
    }

    if start_gameweek > end_gameweek {
        return Err(AppError::config_error(format!(
            "Start gameweek {start_gameweek} is after end gameweek {end_gameweek}"
        )));
    }

    if end_gameweek > crate::constants::season::DEFAULT_GAMEWEEK_COUNT {
        return Err(AppError::config_error(format!(
            "End gameweek cannot exceed {}",
            crate::constants::season::DEFAULT_GAMEWEEK_COUNT
        )));
    }

    if max_retry_attempts < 1 || max_retry_attempts > crate::constants::retry::MAX_ATTEMPTS_LIMIT {
        return Err(AppError::config_error(format!(
            "Retry attempt count must be between 1 and {}",
            crate::constants::retry::MAX_ATTEMPTS_LIMIT
        )));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
