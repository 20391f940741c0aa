use super::Config;
use crate::data_fetcher::processors::is_valid_time_format;
use crate::error::AppError;
use std::path::Path;

/// Validates the structural configuration settings
///
/// # Returns
/// * `Ok(())` - Configuration is valid
/// * `Err(AppError)` - Configuration validation failed
///
/// # Validation Rules
/// - API base URL must be an http(s) URL
/// - Refresh interval and HTTP timeout must be positive
/// - The location time format must be a valid strftime pattern
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let api_base_url = config.api_base_url.trim();
    if api_base_url.is_empty() {
        return Err(AppError::config_error("API base URL cannot be empty"));
    }
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        return Err(AppError::config_error(
            "API base URL must start with http:// or https://",
        ));
    }

    if config.update_interval == 0 {
        return Err(AppError::config_error(
            "update_interval must be greater than zero",
        ));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "http_timeout_seconds must be greater than zero",
        ));
    }

    if !is_valid_time_format(&config.location_time_format) {
        return Err(AppError::config_error(format!(
            "location_time_format '{}' is not a valid strftime pattern",
            config.location_time_format
        )));
    }

    // Validate log file path if provided
    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
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
