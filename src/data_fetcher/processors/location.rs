/// Marker separating the station name from the platform in an event location
const PLATFORM_MARKER: &str = " Platform";

/// Splits an event location such as `"Newcastle Platform 2"` into its station
/// name and platform parts, cutting at the last `" Platform"`.
///
/// Without the marker, text that starts with `"Platform"` is all platform and
/// anything else is all station.
///
/// # Example
/// ```
/// use metro_rti::data_fetcher::processors::split_event_location;
///
/// assert_eq!(
///     split_event_location("Newcastle Platform 2"),
///     ("Newcastle", "Platform 2")
/// );
/// ```
pub fn split_event_location(location: &str) -> (&str, &str) {
    match location.rfind(PLATFORM_MARKER) {
        Some(index) => (&location[..index], &location[index + 1..]),
        None if location.starts_with(PLATFORM_MARKER.trim_start()) => ("", location),
        None => (location, ""),
    }
}
