//! Display formats for show start times

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::date::parse_iso_string;
use crate::error::{Error, Result};

/// Named display formats used on venue and show pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// "Monday March, 15, 2021 at 10:30AM"
    Full,
    /// "Mon 03, 15, 2021 10:30AM"
    #[default]
    Medium,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(DateFormat::Full),
            "medium" => Ok(DateFormat::Medium),
            other => Err(Error::UnknownDateFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Full => write!(f, "full"),
            DateFormat::Medium => write!(f, "medium"),
        }
    }
}

/// Render a timestamp in one of the named display formats
pub fn format_datetime(timestamp: &DateTime<Utc>, format: DateFormat) -> String {
    timestamp.format(format.pattern()).to_string()
}

/// Parse a timestamp string and render it in one of the named display formats
pub fn format_datetime_str(value: &str, format: DateFormat) -> Result<String> {
    let timestamp = parse_iso_string(value)?;
    Ok(format_datetime(&timestamp, format))
}
