//! Checks the configured station and platform against the cached reference data
//! and derives the board's header labels.
//!
//! Every check runs even when an earlier one failed, so a single pass reports
//! all selection problems at once. None of them is fatal.

use tracing::{debug, warn};

use crate::constants::defaults;
use crate::data_fetcher::cache::{CacheStorage, ReferenceDataStore};
use crate::data_fetcher::models::{PlatformNumber, StationCode, platform_numbers};
use crate::error::AppError;
use crate::template::TemplateRenderer;

/// Header labels of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionLabels {
    pub station: String,
    pub platform: String,
}

impl Default for SelectionLabels {
    fn default() -> Self {
        Self {
            station: defaults::STATION_LABEL.to_string(),
            platform: defaults::PLATFORM_LABEL.to_string(),
        }
    }
}

/// Outcome of a selection check
#[derive(Debug, Default)]
pub struct SelectionReport {
    /// Labels to show; placeholders for the parts that could not be resolved
    pub labels: SelectionLabels,
    /// Problems found, in check order
    pub errors: Vec<AppError>,
}

impl SelectionReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a station/platform selection.
///
/// Checks run in this order and all of them always run:
/// 1. station is set
/// 2. station is a key of the station table
/// 3. platform is set
/// 4. platform is one of the station's platforms
///
/// On a full match the platform label is rendered from `platform_format` with
/// the matched platform record, and the station label is the station's name.
/// Failing to read the reference tables is reported as a cache read error.
pub async fn validate_selection<S: CacheStorage>(
    station: Option<&StationCode>,
    platform: Option<&PlatformNumber>,
    store: &mut ReferenceDataStore<S>,
    platform_format: &str,
    renderer: &dyn TemplateRenderer,
) -> SelectionReport {
    let mut report = SelectionReport::default();

    if station.is_none() {
        report.errors.push(AppError::missing_config("station"));
    }

    let mut station_known = false;
    match store.stations().await {
        Ok(stations) => {
            if let Some(code) = station {
                match stations.get(code) {
                    Some(name) => {
                        station_known = true;
                        report.labels.station = name.clone();
                    }
                    None => report.errors.push(AppError::unknown_station(code.as_str())),
                }
            }
        }
        Err(e) => report.errors.push(e),
    }

    if platform.is_none() {
        report.errors.push(AppError::missing_config("platform"));
    }

    match store.platforms().await {
        Ok(platforms) => {
            if let (Some(code), Some(number)) = (station, platform) {
                let record = platforms
                    .get(code)
                    .and_then(|records| records.iter().find(|r| &r.platform_number == number));

                match record {
                    Some(record) if station_known => {
                        match renderer.render(platform_format, &record.template_context()) {
                            Ok(label) => report.labels.platform = label,
                            Err(e) => report.errors.push(e),
                        }
                    }
                    Some(_) => {}
                    None => {
                        report.errors.push(AppError::unknown_platform(
                            code.as_str(),
                            number.as_str(),
                            platform_numbers(&platforms, code),
                        ));
                    }
                }
            }
        }
        Err(e) => report.errors.push(e),
    }

    if report.is_valid() {
        debug!(
            "Selection valid: {} / {}",
            report.labels.station, report.labels.platform
        );
    } else {
        for error in &report.errors {
            warn!("Configuration problem: {}", error);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::cache::ReferenceKind;
    use crate::template::JinjaRenderer;
    use crate::testing_utils::MemoryCacheStorage;

    async fn check(
        storage: &MemoryCacheStorage,
        station: Option<&str>,
        platform: Option<&str>,
        format: &str,
    ) -> SelectionReport {
        let mut store = ReferenceDataStore::new(storage.clone());
        let station = station.map(StationCode::from);
        let platform = platform.map(PlatformNumber::from);
        validate_selection(
            station.as_ref(),
            platform.as_ref(),
            &mut store,
            format,
            &JinjaRenderer::new(),
        )
        .await
    }

    #[tokio::test]
    async fn test_valid_selection_renders_labels() {
        let storage = MemoryCacheStorage::with_samples();
        let report = check(&storage, Some("MTS"), Some("2"), "{{helperText}}").await;

        assert!(report.is_valid(), "{:?}", report.errors);
        assert_eq!(report.labels.station, "Monument");
        assert_eq!(report.labels.platform, "Platform 2 (towards Coast)");
    }

    #[tokio::test]
    async fn test_platform_format_sees_extra_fields() {
        let storage = MemoryCacheStorage::with_samples();
        let report = check(
            &storage,
            Some("MTS"),
            Some("1"),
            "{{platformNumber}}: {{description}}",
        )
        .await;

        assert_eq!(report.labels.platform, "1: Westbound");
    }

    #[tokio::test]
    async fn test_missing_everything_collects_both() {
        let storage = MemoryCacheStorage::with_samples();
        let report = check(&storage, None, None, "{{helperText}}").await;

        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            report.errors[0],
            AppError::MissingConfig { field: "station" }
        ));
        assert!(matches!(
            report.errors[1],
            AppError::MissingConfig { field: "platform" }
        ));
        assert_eq!(report.labels, SelectionLabels::default());
    }

    #[tokio::test]
    async fn test_unknown_station_does_not_stop_later_checks() {
        let storage = MemoryCacheStorage::new();
        storage.put(ReferenceKind::Stations, r#"{"CEN":"Central Station"}"#);
        storage.put(ReferenceKind::Platforms, r#"{"CEN":[{"platformNumber":1}]}"#);

        let report = check(&storage, Some("MTS"), None, "{{helperText}}").await;

        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            &report.errors[0],
            AppError::UnknownStation { code } if code == "MTS"
        ));
        assert!(matches!(
            report.errors[1],
            AppError::MissingConfig { field: "platform" }
        ));
    }

    #[tokio::test]
    async fn test_unknown_platform_lists_valid_ones() {
        let storage = MemoryCacheStorage::with_samples();
        let report = check(&storage, Some("CEN"), Some("7"), "{{helperText}}").await;

        assert_eq!(report.errors.len(), 1);
        let message = report.errors[0].to_string();
        assert!(matches!(
            &report.errors[0],
            AppError::UnknownPlatform { valid, .. } if valid == &vec!["1".to_string(), "2".to_string()]
        ));
        assert!(message.contains("1, 2"), "{message}");
        // Station still resolved
        assert_eq!(report.labels.station, "Central Station");
        assert_eq!(report.labels.platform, "Platform");
    }

    #[tokio::test]
    async fn test_unknown_station_and_platform() {
        let storage = MemoryCacheStorage::with_samples();
        let report = check(&storage, Some("XYZ"), Some("1"), "{{helperText}}").await;

        assert_eq!(report.errors.len(), 2);
        assert!(matches!(report.errors[0], AppError::UnknownStation { .. }));
        assert!(matches!(
            &report.errors[1],
            AppError::UnknownPlatform { valid, .. } if valid.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_bad_platform_format_is_reported() {
        let storage = MemoryCacheStorage::with_samples();
        let report = check(&storage, Some("MTS"), Some("1"), "{{helperTxt}}").await;

        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], AppError::TemplateRender { .. }));
        assert_eq!(report.labels.station, "Monument");
        assert_eq!(report.labels.platform, "Platform");
    }

    #[tokio::test]
    async fn test_missing_cache_is_reported_per_table() {
        let storage = MemoryCacheStorage::new();
        let report = check(&storage, Some("MTS"), Some("1"), "{{helperText}}").await;

        assert_eq!(report.errors.len(), 2);
        assert!(
            report
                .errors
                .iter()
                .all(|e| matches!(e, AppError::CacheRead { .. }))
        );
    }

    #[tokio::test]
    async fn test_platform_without_helper_text_fails_default_format() {
        let storage = MemoryCacheStorage::new();
        storage.put(ReferenceKind::Stations, r#"{"MTS":"Monument"}"#);
        storage.put(
            ReferenceKind::Platforms,
            r#"{"MTS":[{"platformNumber":1,"direction":"W"}]}"#,
        );
        let report = check(&storage, Some("MTS"), Some("1"), "{{helperText}}").await;

        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], AppError::TemplateRender { .. }));
        assert_eq!(report.labels.platform, "Platform");
    }
}
