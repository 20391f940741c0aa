use serde::{Deserialize, Deserializer, Serialize};

/// One record of `/times/{station}/{platform}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArrival {
    /// Train reporting number
    #[serde(deserialize_with = "string_or_number")]
    pub trn: String,
    #[serde(rename = "lastEvent", default)]
    pub last_event: String,
    /// Free text such as `"Haymarket Platform 2"`
    #[serde(rename = "lastEventLocation", default)]
    pub last_event_location: String,
    #[serde(rename = "lastEventTime", default)]
    pub last_event_time: String,
    #[serde(default)]
    pub destination: String,
    /// Minutes until due, negative once the train is overdue or departed
    #[serde(rename = "dueIn")]
    pub due_in: i64,
    #[serde(default)]
    pub line: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(number) => number.to_string(),
    })
}

/// Fields of a display arrival that location templates can refer to.
///
/// Serialized with the camelCase names used in templates, e.g.
/// `{{eventTypeString}} {{eventStation}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalFields {
    #[serde(rename = "trainNumber")]
    pub train_number: String,
    pub event: String,
    #[serde(rename = "eventTypeString")]
    pub event_type_string: String,
    #[serde(rename = "eventStation")]
    pub event_station: String,
    #[serde(rename = "eventPlatform")]
    pub event_platform: String,
    #[serde(rename = "eventTime")]
    pub event_time: String,
    pub destination: String,
    #[serde(rename = "dueIn")]
    pub due_in: i64,
    pub line: String,
}

/// A processed arrival, ready for the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayArrival {
    #[serde(flatten)]
    pub fields: ArrivalFields,
    #[serde(rename = "locationString")]
    pub location_string: String,
}

impl DisplayArrival {
    pub fn train_number(&self) -> &str {
        &self.fields.train_number
    }

    pub fn destination(&self) -> &str {
        &self.fields.destination
    }

    pub fn due_in(&self) -> i64 {
        self.fields.due_in
    }

    pub fn line(&self) -> &str {
        &self.fields.line
    }
}
