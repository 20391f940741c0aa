//! Application-wide constants and configuration defaults
//!
//! This module centralizes the magic numbers, default templates and file names
//! used across the board so they are defined in exactly one place.

/// Base URL of the Nexus real-time information API
pub const DEFAULT_API_BASE_URL: &str = "https://metro-rti.nexus.org.uk/api";

/// Default timeout for HTTP requests in seconds.
/// Kept below the default refresh interval so a hung request cannot stall the board.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 4;

/// Name used for the config directory, cache directory and log file
pub const APP_DIR_NAME: &str = "metro_rti";

/// Default log file name
pub const LOG_FILE_NAME: &str = "metro_rti.log";

/// Defaults for the board options
pub mod defaults {
    /// Refresh interval in milliseconds
    pub const UPDATE_INTERVAL_MS: u64 = 15_000;

    /// Lowest `dueIn` still shown. -1 keeps trains that are just departing.
    pub const MIN_ETA: i64 = -1;

    /// Highest `dueIn` shown, or [`NO_UPPER_BOUND`]
    pub const MAX_ETA: i64 = NO_UPPER_BOUND;

    /// Sentinel for `max_eta` that disables the upper bound entirely
    pub const NO_UPPER_BOUND: i64 = -2;

    /// Maximum number of trains on the board
    pub const MAX_TRAINS: usize = 4;

    pub const PLATFORM_FORMAT: &str = "{{helperText}}";

    pub const LOCATION_FORMAT: &str = "{{eventTypeString}} {{eventStation}}";

    /// chrono strftime pattern, equivalent of "HH:mm"
    pub const LOCATION_TIME_FORMAT: &str = "%H:%M";

    /// Header labels shown until the selection has been validated
    pub const STATION_LABEL: &str = "Station";
    pub const PLATFORM_LABEL: &str = "Platform";
}

/// Reference data cache file names
pub mod cache_files {
    pub const STATIONS: &str = "stations.json";
    pub const PLATFORMS: &str = "platforms.json";
}

/// Environment variable names that override the config file
pub mod env_vars {
    pub const API_URL: &str = "METRO_RTI_API_URL";
    pub const LOG_FILE: &str = "METRO_RTI_LOG_FILE";
    pub const HTTP_TIMEOUT: &str = "METRO_RTI_HTTP_TIMEOUT";
    pub const STATION: &str = "METRO_RTI_STATION";
    pub const PLATFORM: &str = "METRO_RTI_PLATFORM";
}

/// Terminal board layout
pub mod board {
    /// Width of the destination column
    pub const DESTINATION_WIDTH: usize = 20;

    /// Width of the due time column
    pub const DUE_WIDTH: usize = 7;

    /// Left margin of every row
    pub const CONTENT_MARGIN: usize = 1;
}
