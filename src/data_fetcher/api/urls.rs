//! URL building utilities for API endpoints

/// Builds the URL of the station name table.
///
/// # Example
/// ```
/// use metro_rti::data_fetcher::api::build_stations_url;
///
/// let url = build_stations_url("https://api.example.com");
/// assert_eq!(url, "https://api.example.com/stations");
/// ```
pub fn build_stations_url(base_url: &str) -> String {
    format!("{}/stations", base_url.trim_end_matches('/'))
}

/// Builds the URL of the platforms-by-station table.
///
/// # Example
/// ```
/// use metro_rti::data_fetcher::api::build_platforms_url;
///
/// let url = build_platforms_url("https://api.example.com/");
/// assert_eq!(url, "https://api.example.com/stations/platforms");
/// ```
pub fn build_platforms_url(base_url: &str) -> String {
    format!("{}/stations/platforms", base_url.trim_end_matches('/'))
}

/// Builds the URL of the live arrivals for one platform.
///
/// # Example
/// ```
/// use metro_rti::data_fetcher::api::build_times_url;
///
/// let url = build_times_url("https://api.example.com", "MTS", "1");
/// assert_eq!(url, "https://api.example.com/times/MTS/1");
/// ```
pub fn build_times_url(base_url: &str, station: &str, platform: &str) -> String {
    format!(
        "{}/times/{}/{}",
        base_url.trim_end_matches('/'),
        station,
        platform
    )
}

/// Routes a URL through a CORS relay by prefixing it, e.g. `http://localhost:8080/cors?url=`.
/// Without a relay the URL is used directly.
///
/// # Example
/// ```
/// use metro_rti::data_fetcher::api::apply_cors_relay;
///
/// let relayed = apply_cors_relay(Some("http://localhost:8080/cors?url="), "https://a.b/times/MTS/1");
/// assert_eq!(relayed, "http://localhost:8080/cors?url=https://a.b/times/MTS/1");
/// assert_eq!(apply_cors_relay(None, "https://a.b/x"), "https://a.b/x");
/// ```
pub fn apply_cors_relay(relay: Option<&str>, url: &str) -> String {
    match relay {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}{url}"),
        _ => url.to_string(),
    }
}
