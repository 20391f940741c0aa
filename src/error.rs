use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Station/platform selection errors, reported but never fatal
    #[error("'{field}' is a required config property")]
    MissingConfig { field: &'static str },

    #[error("Station with code {code} does not exist")]
    UnknownStation { code: String },

    #[error(
        "Platform \"{platform}\" is not at station \"{station}\". Possible values were [{}]",
        .valid.join(", ")
    )]
    UnknownPlatform {
        station: String,
        platform: String,
        valid: Vec<String>,
    },

    // Reference data cache errors
    #[error("Failed to read cached reference data from {path}: {message}")]
    CacheRead { path: String, message: String },

    #[error("Failed to write cached reference data to {path}: {message}")]
    CacheWrite { path: String, message: String },

    #[error("Failed to render template \"{template}\": {message}")]
    TemplateRender { template: String, message: String },

    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

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

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("API returned empty or missing data: {message} (URL: {url})")]
    ApiNoData { message: String, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

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

    /// Create a missing config property error
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig { field }
    }

    /// Create an unknown station error
    pub fn unknown_station(code: impl Into<String>) -> Self {
        Self::UnknownStation { code: code.into() }
    }

    /// Create an unknown platform error listing the platforms that do exist
    pub fn unknown_platform(
        station: impl Into<String>,
        platform: impl Into<String>,
        valid: Vec<String>,
    ) -> Self {
        Self::UnknownPlatform {
            station: station.into(),
            platform: platform.into(),
            valid,
        }
    }

    /// Create a cache read error
    pub fn cache_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a cache write error
    pub fn cache_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a template render error
    pub fn template_render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateRender {
            template: template.into(),
            message: message.into(),
        }
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

    /// Create an API client error (4xx status codes except 404)
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

    /// Create a no data error
    pub fn api_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// True for every failure of the transport or of decoding an API body
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AppError::ApiFetch(_)
                | AppError::ApiNotFound { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiClientError { .. }
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiMalformedJson { .. }
                | AppError::ApiUnexpectedStructure { .. }
                | AppError::ApiNoData { .. }
        )
    }
}
