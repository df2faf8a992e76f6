//! Contest descriptor documents.
//!
//! A descriptor carries contest-level configuration: name, timing, penalty
//! rules, clarification settings and the problem list. Keys are kebab-case;
//! legacy spellings are accepted as aliases when reading:
//!
//! - `scoreboard-freeze-length` for `scoreboard-freeze-duration`
//! - `freeze` for `scoreboard-freeze`
//! - `penalty` for `penalty-time`
//! - `letter` / `short-name` for a problem's `label` / `name`

use crate::reltime::parse_abstime;
use crate::{ParserError, Result};
use chrono::{DateTime, FixedOffset};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A contest descriptor as read from or written to a YAML/TOML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContestDescriptor {
    /// Contest name
    #[serde(default)]
    pub name: String,

    /// Short name; sanitized to `[A-Za-z0-9_-]` on import
    #[serde(default)]
    pub short_name: String,

    /// Absolute start time
    pub start_time: StartTime,

    /// Contest length as a relative time, e.g. `5:00:00`
    pub duration: String,

    /// Length of the frozen period before the end
    #[serde(
        default,
        alias = "scoreboard-freeze-length",
        skip_serializing_if = "Option::is_none"
    )]
    pub scoreboard_freeze_duration: Option<String>,

    /// Freeze moment as an offset from the start
    #[serde(default, alias = "freeze", skip_serializing_if = "Option::is_none")]
    pub scoreboard_freeze: Option<String>,

    #[serde(default, alias = "penalty", skip_serializing_if = "Option::is_none")]
    pub penalty_time: Option<PenaltyTime>,

    /// Canned clarification answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_clars: Option<Vec<String>>,

    /// Clarification category names, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clar_categories: Option<Vec<String>>,

    /// Submission languages; written on export, ignored on import
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<LanguageEntry>,

    #[serde(default)]
    pub problems: Vec<ProblemEntry>,
}

/// A problem entry of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemEntry {
    /// Contest-unique label, e.g. "A"
    #[serde(default, alias = "letter")]
    pub label: String,

    #[serde(default, alias = "short-name")]
    pub name: String,

    /// HTML color name
    #[serde(default)]
    pub color: Option<String>,

    /// Color as `#rrggbb`
    #[serde(default)]
    pub rgb: Option<String>,
}

/// A language entry of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
}

/// Penalty time in minutes, written either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PenaltyTime {
    Minutes(i64),
    Text(String),
}

impl PenaltyTime {
    /// Penalty in minutes.
    ///
    /// Text is read up to the first non-digit after an optional sign, so
    /// `"20 minutes"` is 20 and text without leading digits is 0. Values
    /// beyond the `i64` range saturate.
    pub fn minutes(&self) -> i64 {
        match self {
            PenaltyTime::Minutes(minutes) => *minutes,
            PenaltyTime::Text(text) => leading_integer(text),
        }
    }
}

fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}

/// Start time of a contest.
///
/// YAML documents carry timestamps as strings, TOML documents may carry a
/// native datetime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartTime {
    /// ISO-8601 text
    Text(String),
    /// Native TOML datetime
    Structured(toml::value::Datetime),
}

impl StartTime {
    /// Resolves the start time to a timestamp.
    ///
    /// Values without an offset are read in the local timezone.
    pub fn resolve(&self) -> Result<DateTime<FixedOffset>> {
        match self {
            StartTime::Text(text) => parse_abstime(text),
            StartTime::Structured(datetime) => {
                if datetime.date.is_none() || datetime.time.is_none() {
                    return Err(ParserError::InvalidTime(datetime.to_string()));
                }
                parse_abstime(&datetime.to_string())
            }
        }
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartTime::Text(text) => f.write_str(text),
            StartTime::Structured(datetime) => write!(f, "{}", datetime),
        }
    }
}

impl Serialize for StartTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StartTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StartTimeVisitor;

        impl<'de> Visitor<'de> for StartTimeVisitor {
            type Value = StartTime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an ISO-8601 timestamp")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<StartTime, E> {
                Ok(StartTime::Text(value.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<StartTime, A::Error> {
                toml::value::Datetime::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(StartTime::Structured)
            }
        }

        deserializer.deserialize_any(StartTimeVisitor)
    }
}
