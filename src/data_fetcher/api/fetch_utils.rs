//! Generic HTTP fetching utilities with error classification
//!
//! Requests are issued exactly once. A failed request is reported to the caller,
//! the next scheduled refresh is the retry.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use crate::error::AppError;

/// Fetches a URL and returns the body of a successful response.
///
/// # Arguments
/// * `client` - HTTP client for making requests
/// * `url` - URL to fetch data from
///
/// # Returns
/// * `Result<String, AppError>` - Response body or a classified error
#[instrument(skip(client))]
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, AppError> {
    info!("Fetching data from URL: {url}");

    let response = client.get(url).send().await.map_err(|e| {
        error!("Request failed for URL {}: {}", url, e);
        if e.is_timeout() {
            AppError::network_timeout(url)
        } else if e.is_connect() {
            AppError::network_connection(url, e.to_string())
        } else {
            AppError::ApiFetch(e)
        }
    })?;

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    let response_text = response.text().await.map_err(|e| {
        error!("Failed to read response text from URL {}: {}", url, e);
        if e.is_timeout() {
            AppError::network_timeout(url)
        } else {
            AppError::ApiFetch(e)
        }
    })?;

    debug!("Response length: {} bytes", response_text.len());
    let preview: String = response_text.chars().take(512).collect();
    debug!("Response text (first 512 chars): {preview}");

    Ok(response_text)
}

/// Parses a response body, telling empty, non-JSON and wrongly shaped bodies apart.
pub fn parse_json_body<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, AppError> {
    serde_json::from_str::<T>(body).map_err(|e| {
        error!("Failed to parse API response: {} (URL: {})", e, url);

        let trimmed = body.trim_start();
        if trimmed.is_empty() {
            AppError::api_no_data("Response body is empty", url)
        } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            AppError::api_malformed_json("Response is not valid JSON", url)
        } else if e.is_syntax() || e.is_eof() {
            AppError::api_malformed_json(e.to_string(), url)
        } else {
            AppError::api_unexpected_structure(e.to_string(), url)
        }
    })
}

/// Fetches a URL and parses its JSON body.
pub async fn fetch<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, AppError> {
    let body = fetch_text(client, url).await?;
    parse_json_body(&body, url)
}
