use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Write;

/// Checks that a strftime pattern only contains supported specifiers.
///
/// # Examples
///
/// ```
/// use metro_rti::data_fetcher::processors::is_valid_time_format;
///
/// assert!(is_valid_time_format("%H:%M"));
/// assert!(!is_valid_time_format("%Q"));
/// ```
pub fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Parses an API event timestamp into local time.
///
/// RFC 3339 timestamps are converted from their offset; timestamps without an
/// offset are read as local time.
pub fn parse_event_time(timestamp: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.with_timezone(&Local));
    }

    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Formats an API event timestamp with a strftime pattern, in local time.
///
/// Timestamps that cannot be parsed, and patterns chrono cannot format, leave
/// the timestamp as the API sent it.
pub fn format_event_time(timestamp: &str, format: &str) -> String {
    let Some(local) = parse_event_time(timestamp) else {
        tracing::debug!("Unparseable event time '{}', showing it verbatim", timestamp);
        return timestamp.to_string();
    };

    let mut formatted = String::new();
    match write!(formatted, "{}", local.format(format)) {
        Ok(()) => formatted,
        Err(_) => {
            tracing::warn!("Invalid time format '{}', showing event time verbatim", format);
            timestamp.to_string()
        }
    }
}
