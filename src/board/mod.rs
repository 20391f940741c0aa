//! Terminal arrivals board

pub mod colors;
pub mod input;
pub mod render;
pub mod terminal;

use crate::config::Config;
use crate::config::selection::SelectionLabels;
use crate::data_fetcher::models::DisplayArrival;

pub use render::{format_due_in, render_lines};
pub use terminal::{BoardDisplay, TerminalManager};

/// Everything the board draws. Replaced as a whole on every publish.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderModel {
    pub station_label: String,
    pub platform_label: String,
    pub trains: Vec<DisplayArrival>,
}

impl RenderModel {
    /// Empty board with the given header labels
    pub fn with_labels(labels: &SelectionLabels) -> Self {
        Self {
            station_label: labels.station.clone(),
            platform_label: labels.platform.clone(),
            trains: Vec::new(),
        }
    }
}

/// Display-only options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    pub colorize: bool,
    pub show_station: bool,
    pub show_platform: bool,
    pub show_destination: bool,
    pub show_location: bool,
    pub show_due_in: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            colorize: true,
            show_station: true,
            show_platform: true,
            show_destination: true,
            show_location: true,
            show_due_in: true,
        }
    }
}

impl From<&Config> for BoardOptions {
    fn from(config: &Config) -> Self {
        Self {
            colorize: config.colorize,
            show_station: config.show_station,
            show_platform: config.show_platform,
            show_destination: config.show_destination,
            show_location: config.show_location,
            show_due_in: config.show_due_in,
        }
    }
}
