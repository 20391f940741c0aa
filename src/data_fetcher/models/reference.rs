use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Station code as used by the API, e.g. `"MTS"` for Monument.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationCode(String);

impl StationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Platform number, scoped to a station.
///
/// The API sends platform numbers as JSON numbers while config files may hold
/// either a string or an integer, so both are normalised to their string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlatformNumber(String);

impl PlatformNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlatformNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

impl From<u32> for PlatformNumber {
    fn from(number: u32) -> Self {
        Self(number.to_string())
    }
}

impl<'de> Deserialize<'de> for PlatformNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPlatform {
            Text(String),
            Integer(i64),
        }

        Ok(match RawPlatform::deserialize(deserializer)? {
            RawPlatform::Text(text) => Self(text.trim().to_string()),
            RawPlatform::Integer(number) => Self(number.to_string()),
        })
    }
}

/// One platform of a station, as listed by `/stations/platforms`.
///
/// Only the platform number and helper text are interpreted; every other
/// field is kept so that platform label templates can refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRecord {
    #[serde(rename = "platformNumber")]
    pub platform_number: PlatformNumber,
    #[serde(
        rename = "helperText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub helper_text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PlatformRecord {
    /// Template context for the platform label
    pub fn template_context(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Station code to display name
pub type StationTable = BTreeMap<StationCode, String>;

/// Station code to the ordered platforms of that station
pub type PlatformTable = BTreeMap<StationCode, Vec<PlatformRecord>>;

/// Platform numbers of a station in API order, empty for unknown stations
pub fn platform_numbers(platforms: &PlatformTable, station: &StationCode) -> Vec<String> {
    platforms
        .get(station)
        .map(|records| {
            records
                .iter()
                .map(|record| record.platform_number.to_string())
                .collect()
        })
        .unwrap_or_default()
}
