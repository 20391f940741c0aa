use crate::constants::{self, defaults, env_vars};
use crate::data_fetcher::models::{PlatformNumber, StationCode};
use crate::data_fetcher::processors::EventPhraseStyle;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod selection;
pub mod validation;

use paths::{get_cache_dir_path, get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration of the arrivals board.
/// Every key is optional in the config file; missing keys take their defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the real-time information API, without a trailing `/times`.
    pub api_base_url: String,
    /// Optional relay prefix for arrivals requests, e.g. `http://localhost:8080/cors?url=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors_relay: Option<String>,
    /// Directory holding the cached station and platform tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests.
    pub http_timeout_seconds: u64,
    /// Download fresh reference data when the board starts.
    pub update_cache_on_start: bool,
    /// Refresh interval in milliseconds.
    pub update_interval: u64,
    pub colorize: bool,
    pub show_station: bool,
    pub show_platform: bool,
    pub show_destination: bool,
    pub show_location: bool,
    pub show_due_in: bool,
    /// Template of the platform label, rendered with the platform's record.
    pub platform_format: String,
    /// Template of each train's location string.
    pub location_format: String,
    /// chrono strftime pattern for `{{eventTime}}`.
    pub location_time_format: String,
    pub event_phrases: EventPhraseStyle,
    pub min_eta: i64,
    /// Upper `dueIn` bound; -2 disables it.
    pub max_eta: i64,
    pub max_trains: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<StationCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformNumber>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            cors_relay: None,
            cache_dir: None,
            log_file_path: None,
            http_timeout_seconds: constants::DEFAULT_HTTP_TIMEOUT_SECONDS,
            update_cache_on_start: false,
            update_interval: defaults::UPDATE_INTERVAL_MS,
            colorize: true,
            show_station: true,
            show_platform: true,
            show_destination: true,
            show_location: true,
            show_due_in: true,
            platform_format: defaults::PLATFORM_FORMAT.to_string(),
            location_format: defaults::LOCATION_FORMAT.to_string(),
            location_time_format: defaults::LOCATION_TIME_FORMAT.to_string(),
            event_phrases: EventPhraseStyle::Text,
            min_eta: defaults::MIN_ETA,
            max_eta: defaults::MAX_ETA,
            max_trains: defaults::MAX_TRAINS,
            station: None,
            platform: None,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default config file location.
    /// A missing file yields the defaults. Environment variables override file values.
    ///
    /// # Environment Variables
    /// - `METRO_RTI_API_URL` - Override API base URL
    /// - `METRO_RTI_LOG_FILE` - Override log file path
    /// - `METRO_RTI_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `METRO_RTI_STATION` - Override station code
    /// - `METRO_RTI_PLATFORM` - Override platform number
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - The file could not be read or parsed, or failed validation
    pub async fn load(path: Option<&str>) -> Result<Self, AppError> {
        let config_path = path.map(str::to_string).unwrap_or_else(get_config_path);

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            tracing::info!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a file without environment overrides or validation.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies the `METRO_RTI_*` environment variables on top of the current values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_url) = std::env::var(env_vars::API_URL) {
            self.api_base_url = api_url;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(station) = std::env::var(env_vars::STATION) {
            self.station = Some(StationCode::new(station.trim()));
        }

        if let Ok(platform) = std::env::var(env_vars::PLATFORM) {
            self.platform = Some(PlatformNumber::new(platform.trim()));
        }
    }

    /// Validates the structural configuration settings.
    ///
    /// The station and platform selection is checked separately against the
    /// reference data, see [`selection`].
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Refresh interval of the arrivals board
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval)
    }

    /// Directory of the reference data cache
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(get_cache_dir_path()))
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and current settings
    /// - Handles case when no config file exists
    pub async fn display(path: Option<&str>) -> Result<(), AppError> {
        let config_path = path.map(str::to_string).unwrap_or_else(get_config_path);
        let log_dir = get_log_dir_path();

        if !Path::new(&config_path).exists() {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            println!("(Defaults and environment overrides apply)");
        }

        let config = Config::load(Some(config_path.as_str())).await?;
        let unset = || "(not set)".to_string();

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        println!("────────────────────────────────────");
        println!("Station / Platform:");
        println!(
            "{} / {}",
            config.station.as_ref().map(ToString::to_string).unwrap_or_else(unset),
            config.platform.as_ref().map(ToString::to_string).unwrap_or_else(unset)
        );
        println!("────────────────────────────────────");
        println!("API Base URL:");
        println!("{}", config.api_base_url);
        if let Some(relay) = &config.cors_relay {
            println!("(relayed through {relay})");
        }
        println!("────────────────────────────────────");
        println!("Refresh Interval / HTTP Timeout:");
        println!(
            "{} ms / {} seconds",
            config.update_interval, config.http_timeout_seconds
        );
        println!("────────────────────────────────────");
        println!("ETA Window / Max Trains:");
        let max = if config.max_eta == defaults::NO_UPPER_BOUND {
            "unbounded".to_string()
        } else {
            config.max_eta.to_string()
        };
        println!("{} .. {} / {}", config.min_eta, max, config.max_trains);
        println!("────────────────────────────────────");
        println!("Cache Location:");
        println!("{}", config.cache_dir().display());
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{}", constants::LOG_FILE_NAME);
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized with #[serial]
        unsafe {
            for var in [
                env_vars::API_URL,
                env_vars::LOG_FILE,
                env_vars::HTTP_TIMEOUT,
                env_vars::STATION,
                env_vars::PLATFORM,
            ] {
                std::env::remove_var(var);
            }
        }
    }

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config_content = r#"
station = "MTS"
platform = 2
update_interval = 30000
max_eta = 15
location_format = "{{eventTypeString}} {{eventStation}} ({{eventTime}})"
event_phrases = "emoji"
"#;
        tokio::fs::write(&config_path, config_content).await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();

        assert_eq!(config.station, Some(StationCode::from("MTS")));
        assert_eq!(config.platform, Some(PlatformNumber::from("2")));
        assert_eq!(config.update_interval(), Duration::from_secs(30));
        assert_eq!(config.max_eta, 15);
        assert_eq!(config.event_phrases, EventPhraseStyle::Emoji);
        // Untouched keys keep their defaults
        assert_eq!(config.min_eta, -1);
        assert_eq!(config.max_trains, 4);
        assert_eq!(config.platform_format, "{{helperText}}");
        assert!(config.colorize);
    }

    #[tokio::test]
    async fn test_platform_as_string() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "platform = \"3\"").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(config.platform, Some(PlatformNumber::from(3)));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.update_cache_on_start);
        assert_eq!(config.update_interval, 15_000);
        assert_eq!(config.min_eta, -1);
        assert_eq!(config.max_eta, -2);
        assert_eq!(config.max_trains, 4);
        assert_eq!(config.location_format, "{{eventTypeString}} {{eventStation}}");
        assert_eq!(config.location_time_format, "%H:%M");
        assert!(config.station.is_none());
        assert!(config.platform.is_none());
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config = Config {
            station: Some("CEN".into()),
            platform: Some("1".into()),
            log_file_path: Some("/custom/log/path".to_string()),
            max_trains: 6,
            ..Config::default()
        };
        config.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(content.contains("station = \"CEN\""), "{content}");
        assert!(!content.contains("cors_relay"), "None values are skipped: {content}");

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_config_load_invalid_toml() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "station = [").await.unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_wrong_type() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "max_trains = \"four\"").await.unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_load_from_nonexistent_path() {
        let result = Config::load_from_path("/nonexistent/path/config.toml").await;
        assert!(matches!(result.unwrap_err(), AppError::Io(_)));
    }

    #[tokio::test]
    #[serial]
    async fn test_load_missing_file_uses_defaults() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("absent.toml");

        let config = Config::load(missing.to_str()).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_env_overrides() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "station = \"MTS\"\nplatform = 1\n")
            .await
            .unwrap();

        // SAFETY: serialized with #[serial]
        unsafe {
            std::env::set_var(env_vars::STATION, "HAY");
            std::env::set_var(env_vars::PLATFORM, " 2 ");
            std::env::set_var(env_vars::HTTP_TIMEOUT, "5");
            std::env::set_var(env_vars::API_URL, "http://localhost:9999/api");
        }

        let config = Config::load(config_path.to_str()).await;
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.station, Some(StationCode::from("HAY")));
        assert_eq!(config.platform, Some(PlatformNumber::from("2")));
        assert_eq!(config.http_timeout_seconds, 5);
        assert_eq!(config.api_base_url, "http://localhost:9999/api");
    }

    #[tokio::test]
    #[serial]
    async fn test_unparseable_timeout_env_is_ignored() {
        clear_env();
        // SAFETY: serialized with #[serial]
        unsafe {
            std::env::set_var(env_vars::HTTP_TIMEOUT, "soon");
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        clear_env();

        assert_eq!(
            config.http_timeout_seconds,
            constants::DEFAULT_HTTP_TIMEOUT_SECONDS
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_load_rejects_invalid_values() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "update_interval = 0").await.unwrap();

        let result = Config::load(config_path.to_str()).await;
        assert!(matches!(result.unwrap_err(), AppError::Config(_)));
    }

    #[test]
    fn test_cache_dir_override() {
        let config = Config {
            cache_dir: Some("/tmp/metro-cache".to_string()),
            ..Config::default()
        };
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/metro-cache"));
        assert!(
            Config::default()
                .cache_dir()
                .to_string_lossy()
                .contains(constants::APP_DIR_NAME)
        );
    }

    #[test]
    fn test_get_config_path() {
        let path = Config::get_config_path();
        assert!(path.contains("metro_rti"));
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let path = Config::get_log_dir_path();
        assert!(path.contains("metro_rti"));
        assert!(path.ends_with("logs"));
    }
}
