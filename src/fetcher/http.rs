//! Resilient HTTP fetching: shared client construction, URL building, and a
//! generic fetch with bounded exponential-backoff retry.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::constants;
use crate::error::AppError;

/// Creates the shared HTTP client with a per-attempt timeout and pooled
/// connections. One client serves the whole run.
pub fn create_http_client(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
}

/// URL of the reference metadata endpoint
pub fn bootstrap_url(api_base_url: &str) -> String {
    format!("{}/bootstrap-static/", api_base_url.trim_end_matches('/'))
}

/// URL of the per-gameweek live endpoint
pub fn event_live_url(api_base_url: &str, gameweek: u32) -> String {
    format!(
        "{}/event/{}/live/",
        api_base_url.trim_end_matches('/'),
        gameweek
    )
}

/// URL of the per-player history endpoint
pub fn element_summary_url(api_base_url: &str, player_id: i64) -> String {
    format!(
        "{}/element-summary/{}/",
        api_base_url.trim_end_matches('/'),
        player_id
    )
}

/// Fetch a URL and parse the JSON body, retrying transient failures with
/// exponential backoff.
///
/// The retry budget is `max_attempts` total attempts; the wait before attempt
/// N+1 is `2^(N-1)` seconds (1, 2, 4 for the default budget of three). A
/// per-attempt timeout counts as a retryable failure. Parse failures are
/// never retried: a structurally invalid body will not change on retry.
///
/// Returns the parsed payload together with the verbatim response body so the
/// caller can persist a raw capture.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    max_attempts: u32,
) -> Result<(T, String), AppError> {
    info!("Fetching data from URL: {url}");
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match fetch_body(client, url).await {
            Ok(body) => {
                let parsed = parse_payload(&body, url)?;
                return Ok((parsed, body));
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let wait = backoff_delay(attempt);
                warn!(
                    "Request failed (attempt {attempt}/{max_attempts}) for {url}: {e}; retrying in {wait:?}"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) if e.is_retryable() => {
                error!("Retries exhausted after {max_attempts} attempts for {url}: {e}");
                return Err(AppError::retries_exhausted(max_attempts, url, e.to_string()));
            }
            Err(e) => {
                error!("Request failed for URL {url}: {e}");
                return Err(e);
            }
        }
    }
}

/// Backoff before the attempt following `attempt`: 2^(attempt-1) seconds,
/// clamped so an out-of-range attempt count can neither overflow the shift
/// nor sleep for hours.
fn backoff_delay(attempt: u32) -> Duration {
    let seconds = constants::retry::BASE_DELAY_SECONDS
        .checked_shl(attempt - 1)
        .map_or(constants::retry::MAX_DELAY_SECONDS, |s| {
            s.min(constants::retry::MAX_DELAY_SECONDS)
        });
    Duration::from_secs(seconds)
}

/// One request attempt: send, classify the status, read the body.
async fn fetch_body(client: &Client, url: &str) -> Result<String, AppError> {
    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            return if e.is_timeout() {
                Err(AppError::network_timeout(url))
            } else if e.is_connect() {
                Err(AppError::network_connection(url, e.to_string()))
            } else {
                Err(AppError::ApiFetch(e))
            };
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            AppError::network_timeout(url)
        } else {
            AppError::ApiFetch(e)
        }
    })?;

    debug!("Response length: {} bytes", body.len());
    Ok(body)
}

/// Parse a response body, distinguishing malformed JSON from a valid JSON
/// document with an unexpected structure.
fn parse_payload<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, AppError> {
    match serde_json::from_str::<T>(body) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            let trimmed = body.trim_start();
            if body.trim().is_empty() {
                Err(AppError::api_malformed_json("Response body is empty", url))
            } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    url,
                ))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}
