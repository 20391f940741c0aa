use std::sync::Arc;

use tracing::{debug, warn};

use super::event_phrases::EventPhraseStyle;
use super::location::split_event_location;
use super::time_formatting::format_event_time;
use crate::config::Config;
use crate::constants::defaults;
use crate::data_fetcher::models::{ArrivalFields, DisplayArrival, RawArrival};
use crate::error::AppError;
use crate::template::TemplateRenderer;

/// Inclusive `[min, max]` range of `dueIn` values shown on the board.
///
/// A `max` of [`defaults::NO_UPPER_BOUND`] (-2) disables the upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtaWindow {
    pub min: i64,
    pub max: i64,
}

impl EtaWindow {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Whether a train due in `due_in` minutes is shown
    pub fn admits(&self, due_in: i64) -> bool {
        if due_in < self.min {
            return false;
        }
        self.max == defaults::NO_UPPER_BOUND || due_in <= self.max
    }
}

impl Default for EtaWindow {
    fn default() -> Self {
        Self::new(defaults::MIN_ETA, defaults::MAX_ETA)
    }
}

/// Settings of [`ArrivalsProcessor`], taken from the board config
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorSettings {
    pub window: EtaWindow,
    pub max_trains: usize,
    pub location_format: String,
    pub time_format: String,
    pub phrases: EventPhraseStyle,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            window: EtaWindow::default(),
            max_trains: defaults::MAX_TRAINS,
            location_format: defaults::LOCATION_FORMAT.to_string(),
            time_format: defaults::LOCATION_TIME_FORMAT.to_string(),
            phrases: EventPhraseStyle::default(),
        }
    }
}

impl From<&Config> for ProcessorSettings {
    fn from(config: &Config) -> Self {
        Self {
            window: EtaWindow::new(config.min_eta, config.max_eta),
            max_trains: config.max_trains,
            location_format: config.location_format.clone(),
            time_format: config.location_time_format.clone(),
            phrases: config.event_phrases,
        }
    }
}

/// Output of one processing pass
#[derive(Debug, Default)]
pub struct ProcessedArrivals {
    /// Accepted arrivals in API order, at most `max_trains` of them
    pub trains: Vec<DisplayArrival>,
    /// Records dropped because their location template failed to render
    pub errors: Vec<AppError>,
}

impl ProcessedArrivals {
    /// True when arrivals were accepted but none of them could be rendered
    pub fn all_failed(&self) -> bool {
        self.trains.is_empty() && !self.errors.is_empty()
    }
}

/// Filters, caps and formats raw arrivals into display arrivals.
pub struct ArrivalsProcessor {
    settings: ProcessorSettings,
    renderer: Arc<dyn TemplateRenderer>,
}

impl ArrivalsProcessor {
    pub fn new(settings: ProcessorSettings, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { settings, renderer }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Processes arrivals in API order.
    ///
    /// Records outside the ETA window are skipped. Processing stops as soon as
    /// `max_trains` records have been accepted, so later records are never
    /// transformed. A record whose location template fails is dropped and its
    /// error collected; it does not count towards `max_trains`.
    pub fn process(&self, raw: &[RawArrival]) -> ProcessedArrivals {
        let mut processed = ProcessedArrivals::default();

        for arrival in raw {
            if processed.trains.len() >= self.settings.max_trains {
                break;
            }

            if !self.settings.window.admits(arrival.due_in) {
                debug!(
                    "Skipping train {} due in {} (outside {:?})",
                    arrival.trn, arrival.due_in, self.settings.window
                );
                continue;
            }

            match self.transform(arrival) {
                Ok(display) => processed.trains.push(display),
                Err(e) => {
                    warn!("Dropping train {} from the board: {}", arrival.trn, e);
                    processed.errors.push(e);
                }
            }
        }

        processed
    }

    fn transform(&self, arrival: &RawArrival) -> Result<DisplayArrival, AppError> {
        let (event_station, event_platform) = split_event_location(&arrival.last_event_location);

        let fields = ArrivalFields {
            train_number: arrival.trn.clone(),
            event: arrival.last_event.clone(),
            event_type_string: self.settings.phrases.phrase(&arrival.last_event).to_string(),
            event_station: event_station.to_string(),
            event_platform: event_platform.to_string(),
            event_time: format_event_time(&arrival.last_event_time, &self.settings.time_format),
            destination: arrival.destination.clone(),
            due_in: arrival.due_in,
            line: arrival.line.clone(),
        };

        let context = serde_json::to_value(&fields)
            .map_err(|e| AppError::template_render(&self.settings.location_format, e.to_string()))?;
        let location_string = self
            .renderer
            .render(&self.settings.location_format, &context)?;

        Ok(DisplayArrival {
            fields,
            location_string,
        })
    }
}
