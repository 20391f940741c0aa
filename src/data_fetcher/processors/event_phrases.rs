use serde::{Deserialize, Serialize};

/// Which phrase table translates API event codes for the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhraseStyle {
    /// "Approaching", "Arrived at", ...
    #[default]
    Text,
    /// Emoji pairs for compact boards
    Emoji,
}

impl EventPhraseStyle {
    /// Phrase for an event code, or the code itself when the table has no entry.
    ///
    /// # Example
    /// ```
    /// use metro_rti::data_fetcher::processors::EventPhraseStyle;
    ///
    /// assert_eq!(EventPhraseStyle::Text.phrase("ARRIVED"), "Arrived at");
    /// assert_eq!(EventPhraseStyle::Text.phrase("DELAYED"), "DELAYED");
    /// ```
    pub fn phrase<'a>(&self, event_code: &'a str) -> &'a str {
        let known = match self {
            EventPhraseStyle::Text => text_phrase(event_code),
            EventPhraseStyle::Emoji => emoji_phrase(event_code),
        };
        known.unwrap_or(event_code)
    }
}

fn text_phrase(event_code: &str) -> Option<&'static str> {
    match event_code {
        "APPROACHING" => Some("Approaching"),
        "ARRIVED" => Some("Arrived at"),
        "DEPARTED" => Some("Departed from"),
        "READY_TO_START" => Some("Starting at"),
        _ => None,
    }
}

fn emoji_phrase(event_code: &str) -> Option<&'static str> {
    match event_code {
        "APPROACHING" => Some("🛤️➡️"),
        "ARRIVED" => Some("🚉🛑"),
        "DEPARTED" => Some("🚉➡️"),
        "READY_TO_START" => Some("🛤️🛑"),
        _ => None,
    }
}
