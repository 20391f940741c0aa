pub mod arrivals;
pub mod event_phrases;
pub mod location;
pub mod time_formatting;

pub use arrivals::{ArrivalsProcessor, EtaWindow, ProcessedArrivals, ProcessorSettings};
pub use event_phrases::EventPhraseStyle;
pub use location::split_event_location;
pub use time_formatting::{format_event_time, is_valid_time_format, parse_event_time};
