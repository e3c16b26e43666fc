use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// A 24-hour time of day exactly as the server wrote it. The parsed value is
/// used for comparisons and display; the raw text is what gets sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTime {
    raw: String,
    time: NaiveTime,
}

impl ServerTime {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map_err(|_| format!("'{}' is not a HH:MM[:SS] time", raw))?;

        Ok(Self { raw: trimmed.to_string(), time })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Display label such as `9:30 AM`.
    pub fn label_12h(&self) -> String {
        format_12h(self.time)
    }
}

impl fmt::Display for ServerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ServerTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ServerTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ServerTime::parse(&raw).map_err(de::Error::custom)
    }
}

pub fn format_12h(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if is_pm { "PM" } else { "AM" })
}

/// `YYYY-MM-DD`, the only date format the backend accepts.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
