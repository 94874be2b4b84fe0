//! Date/time format descriptors.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, ParseError};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DateFinderError;

/// What a format (and a detected column) represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalType {
    /// Calendar date without a time of day.
    Date,
    /// Time of day without a date.
    Time,
    /// Date and time in a single value.
    Timestamp,
}

impl TemporalType {
    /// All variants, in the order used for per-type caches.
    pub const ALL: [TemporalType; 3] = [TemporalType::Date, TemporalType::Time, TemporalType::Timestamp];

    /// Position in [`TemporalType::ALL`].
    pub fn ordinal(self) -> usize {
        match self {
            TemporalType::Date => 0,
            TemporalType::Time => 1,
            TemporalType::Timestamp => 2,
        }
    }

    /// Whether values of this type carry a calendar date.
    pub fn has_date(self) -> bool {
        !matches!(self, TemporalType::Time)
    }
}

impl fmt::Display for TemporalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemporalType::Date => "date",
            TemporalType::Time => "time",
            TemporalType::Timestamp => "timestamp",
        };
        f.pad(name)
    }
}

/// Cheap pre-filter applied to cells before a real parse is attempted.
#[derive(Debug, Clone)]
pub enum FormatFilter {
    /// Cells must match this expression.
    Regex(Regex),
    /// The shape cannot be expressed as a regex; the format is scored by parsing only.
    NoFilter,
}

impl FormatFilter {
    /// Whether a cell passes the filter.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FormatFilter::Regex(re) => re.is_match(value),
            FormatFilter::NoFilter => true,
        }
    }

    /// Source of the regex, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormatFilter::Regex(re) => Some(re.as_str()),
            FormatFilter::NoFilter => None,
        }
    }
}

impl PartialEq for FormatFilter {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// A catalog entry: how to recognise and parse one date/time layout.
///
/// `pattern` uses chrono's `strftime` syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FormatSpec", into = "FormatSpec")]
pub struct DateFormat {
    key: String,
    temporal_type: TemporalType,
    pattern: String,
    filter: FormatFilter,
}

impl DateFormat {
    /// Create a format, checking that the pattern is valid strftime.
    pub fn new(
        key: impl Into<String>,
        temporal_type: TemporalType,
        pattern: impl Into<String>,
        filter: FormatFilter,
    ) -> crate::Result<Self> {
        let key = key.into();
        let pattern = pattern.into();

        if pattern.trim().is_empty() {
            return Err(DateFinderError::InvalidFormat {
                key,
                message: "empty pattern".to_string(),
            });
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(DateFinderError::InvalidFormat {
                key,
                message: format!("unsupported strftime pattern '{}'", pattern),
            });
        }

        Ok(Self {
            key,
            temporal_type,
            pattern,
            filter,
        })
    }

    /// Create a format guarded by a regex pre-filter.
    pub fn with_regex(
        key: impl Into<String>,
        temporal_type: TemporalType,
        pattern: impl Into<String>,
        regex: &str,
    ) -> crate::Result<Self> {
        Self::new(key, temporal_type, pattern, FormatFilter::Regex(Regex::new(regex)?))
    }

    /// Create a format that is only ever scored by parsing.
    pub fn unfiltered(
        key: impl Into<String>,
        temporal_type: TemporalType,
        pattern: impl Into<String>,
    ) -> crate::Result<Self> {
        Self::new(key, temporal_type, pattern, FormatFilter::NoFilter)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn temporal_type(&self) -> TemporalType {
        self.temporal_type
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn filter(&self) -> &FormatFilter {
        &self.filter
    }

    /// Whether a trimmed cell passes this format's pre-filter.
    pub fn matches(&self, value: &str) -> bool {
        self.filter.matches(value)
    }

    /// Whether the pattern contains a year.
    pub fn has_year(&self) -> bool {
        specifiers(&self.pattern)
            .iter()
            .any(|c| matches!(c, 'Y' | 'y' | 'C' | 'G' | 'g' | 'D' | 'F' | 'c' | '+' | 'x' | 's'))
    }

    /// Day-before-month numeric layouts (`%d/%m/%Y`) cannot be told apart
    /// from month-before-day ones without a month name.
    pub fn is_ambiguous(&self) -> bool {
        let specs = specifiers(&self.pattern);
        if specs.iter().any(|c| matches!(c, 'b' | 'B' | 'h')) {
            return false;
        }
        let day = specs.iter().position(|c| matches!(c, 'd' | 'e'));
        let month = specs.iter().position(|c| *c == 'm');
        match (day, month) {
            (Some(day), Some(month)) => day < month,
            _ => false,
        }
    }

    fn has_offset(&self) -> bool {
        specifiers(&self.pattern).iter().any(|c| matches!(c, 'z' | '+'))
    }

    /// Parse a value into the instant it describes.
    ///
    /// Dates land on midnight, times on 1970-01-01, and offset-aware
    /// timestamps are normalised to UTC.
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime, ParseError> {
        let value = value.trim();
        match self.temporal_type {
            TemporalType::Date => NaiveDate::parse_from_str(value, &self.pattern)
                .map(|d| d.and_time(NaiveTime::default())),
            TemporalType::Time => NaiveTime::parse_from_str(value, &self.pattern)
                .map(|t| NaiveDate::default().and_time(t)),
            TemporalType::Timestamp if self.has_offset() => {
                DateTime::parse_from_str(value, &self.pattern).map(|dt| dt.naive_utc())
            }
            TemporalType::Timestamp => NaiveDateTime::parse_from_str(value, &self.pattern),
        }
    }

    /// Parse only the time-of-day part.
    pub fn parse_time(&self, value: &str) -> Result<NaiveTime, ParseError> {
        self.parse(value).map(|dt| dt.time())
    }

    /// Parse only the calendar date part.
    pub fn parse_date(&self, value: &str) -> Result<NaiveDate, ParseError> {
        self.parse(value).map(|dt| dt.date())
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.pattern)
    }
}

/// Conversion specifiers of a strftime pattern, flags stripped.
fn specifiers(pattern: &str) -> Vec<char> {
    let mut specs = Vec::new();
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            continue;
        }
        for next in chars.by_ref() {
            match next {
                '-' | '_' | '0' | '#' | ':' | '.' | '1'..='9' => continue,
                '%' => break,
                spec => {
                    specs.push(spec);
                    break;
                }
            }
        }
    }

    specs
}

/// Serialized shape of a [`DateFormat`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FormatSpec {
    key: String,
    #[serde(rename = "type")]
    temporal_type: TemporalType,
    pattern: String,
    /// `null` or missing means no pre-filter.
    #[serde(default)]
    regex: Option<String>,
}

impl TryFrom<FormatSpec> for DateFormat {
    type Error = DateFinderError;

    fn try_from(spec: FormatSpec) -> Result<Self, Self::Error> {
        match spec.regex {
            Some(regex) => DateFormat::with_regex(spec.key, spec.temporal_type, spec.pattern, &regex),
            None => DateFormat::unfiltered(spec.key, spec.temporal_type, spec.pattern),
        }
    }
}

impl From<DateFormat> for FormatSpec {
    fn from(format: DateFormat) -> Self {
        let regex = format.filter.as_str().map(str::to_string);
        Self {
            key: format.key,
            temporal_type: format.temporal_type,
            pattern: format.pattern,
            regex,
        }
    }
}
