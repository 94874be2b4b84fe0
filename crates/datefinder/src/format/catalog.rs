//! Ordered catalog of recognised date/time formats.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::types::{DateFormat, TemporalType};
use crate::error::{DateFinderError, Result};

// =============================================================================
// BUILT-IN FORMATS
// =============================================================================
// (key, type, strftime pattern, pre-filter regex). Order is scan order and
// breaks ties between equally good formats, so more specific layouts come first.

const BUILTIN_FORMATS: &[(&str, TemporalType, &str, &str)] = &[
    // Timestamps
    ("rfc3339", TemporalType::Timestamp, "%+", r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?(Z|[+-]\d{2}:\d{2})$"),
    ("iso_datetime_t", TemporalType::Timestamp, "%Y-%m-%dT%H:%M:%S", r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$"),
    ("iso_datetime_t_fraction", TemporalType::Timestamp, "%Y-%m-%dT%H:%M:%S%.f", r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{1,9}$"),
    ("iso_datetime", TemporalType::Timestamp, "%Y-%m-%d %H:%M:%S", r"^\d{4}-\d{2}-\d{2} \d{1,2}:\d{2}:\d{2}$"),
    ("iso_datetime_fraction", TemporalType::Timestamp, "%Y-%m-%d %H:%M:%S%.f", r"^\d{4}-\d{2}-\d{2} \d{1,2}:\d{2}:\d{2}\.\d{1,9}$"),
    ("iso_datetime_minutes", TemporalType::Timestamp, "%Y-%m-%d %H:%M", r"^\d{4}-\d{2}-\d{2} \d{1,2}:\d{2}$"),
    ("iso_slash_datetime", TemporalType::Timestamp, "%Y/%m/%d %H:%M:%S", r"^\d{4}/\d{1,2}/\d{1,2} \d{1,2}:\d{2}:\d{2}$"),
    ("us_datetime", TemporalType::Timestamp, "%m/%d/%Y %H:%M:%S", r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}:\d{2}$"),
    ("us_datetime_minutes", TemporalType::Timestamp, "%m/%d/%Y %H:%M", r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}$"),
    ("us_datetime_12h", TemporalType::Timestamp, "%m/%d/%Y %I:%M:%S %p", r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}:\d{2} [AaPp][Mm]$"),
    ("us_datetime_12h_minutes", TemporalType::Timestamp, "%m/%d/%Y %I:%M %p", r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2} [AaPp][Mm]$"),
    ("eu_datetime", TemporalType::Timestamp, "%d/%m/%Y %H:%M:%S", r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}:\d{2}$"),
    ("eu_dot_datetime", TemporalType::Timestamp, "%d.%m.%Y %H:%M:%S", r"^\d{1,2}\.\d{1,2}\.\d{4} \d{1,2}:\d{2}:\d{2}$"),
    ("day_month_name_datetime", TemporalType::Timestamp, "%d %b %Y %H:%M:%S", r"^\d{1,2} [A-Za-z]{3,9} \d{4} \d{1,2}:\d{2}:\d{2}$"),
    ("rfc2822", TemporalType::Timestamp, "%a, %d %b %Y %H:%M:%S %z", r"^[A-Za-z]{3}, \d{1,2} [A-Za-z]{3} \d{4} \d{2}:\d{2}:\d{2} [+-]\d{4}$"),
    ("epoch_seconds", TemporalType::Timestamp, "%s", r"^1\d{9}$"),
    // Dates
    ("iso_date", TemporalType::Date, "%Y-%m-%d", r"^\d{4}-\d{1,2}-\d{1,2}$"),
    ("iso_slash_date", TemporalType::Date, "%Y/%m/%d", r"^\d{4}/\d{1,2}/\d{1,2}$"),
    ("compact_date", TemporalType::Date, "%Y%m%d", r"^(19|20)\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])$"),
    ("us_date", TemporalType::Date, "%m/%d/%Y", r"^\d{1,2}/\d{1,2}/\d{4}$"),
    ("us_dash_date", TemporalType::Date, "%m-%d-%Y", r"^\d{1,2}-\d{1,2}-\d{4}$"),
    ("us_short_year_date", TemporalType::Date, "%m/%d/%y", r"^\d{1,2}/\d{1,2}/\d{2}$"),
    ("eu_date", TemporalType::Date, "%d/%m/%Y", r"^\d{1,2}/\d{1,2}/\d{4}$"),
    ("eu_dot_date", TemporalType::Date, "%d.%m.%Y", r"^\d{1,2}\.\d{1,2}\.\d{4}$"),
    ("eu_dash_date", TemporalType::Date, "%d-%m-%Y", r"^\d{1,2}-\d{1,2}-\d{4}$"),
    ("day_month_name_date", TemporalType::Date, "%d %b %Y", r"^\d{1,2} [A-Za-z]{3,9} \d{4}$"),
    ("day_month_abbr_dash_date", TemporalType::Date, "%d-%b-%Y", r"^\d{1,2}-[A-Za-z]{3}-\d{4}$"),
    ("month_name_day_date", TemporalType::Date, "%b %d, %Y", r"^[A-Za-z]{3,9} \d{1,2}, \d{4}$"),
    ("month_day", TemporalType::Date, "%m/%d", r"^\d{1,2}/\d{1,2}$"),
    // Times
    ("time_hms", TemporalType::Time, "%H:%M:%S", r"^\d{1,2}:\d{2}:\d{2}$"),
    ("time_hms_fraction", TemporalType::Time, "%H:%M:%S%.f", r"^\d{1,2}:\d{2}:\d{2}\.\d{1,9}$"),
    ("time_hm", TemporalType::Time, "%H:%M", r"^\d{1,2}:\d{2}$"),
    ("time_12h", TemporalType::Time, "%I:%M %p", r"^\d{1,2}:\d{2} [AaPp][Mm]$"),
    ("time_12h_seconds", TemporalType::Time, "%I:%M:%S %p", r"^\d{1,2}:\d{2}:\d{2} [AaPp][Mm]$"),
];

static BUILTIN: Lazy<FormatCatalog> = Lazy::new(|| {
    let formats = BUILTIN_FORMATS
        .iter()
        .map(|(key, ty, pattern, regex)| {
            DateFormat::with_regex(*key, *ty, *pattern, regex)
                .unwrap_or_else(|e| panic!("built-in format '{key}' is invalid: {e}"))
        })
        .collect();
    FormatCatalog { formats }
});

/// Ordered list of date/time formats.
///
/// Order decides both scan order and which of two equally good formats wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatCatalog {
    formats: Vec<DateFormat>,
}

impl FormatCatalog {
    /// Build a catalog, rejecting duplicate keys.
    pub fn new(formats: Vec<DateFormat>) -> Result<Self> {
        let mut seen = HashSet::new();
        for format in &formats {
            if !seen.insert(format.key()) {
                return Err(DateFinderError::InvalidFormat {
                    key: format.key().to_string(),
                    message: "duplicate key".to_string(),
                });
            }
        }
        Ok(Self { formats })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Load a catalog from a JSON array of `{key, type, pattern, regex}` objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let formats: Vec<DateFormat> = serde_json::from_str(json)?;
        Self::new(formats)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| DateFinderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Append a format, rejecting a duplicate key.
    pub fn push(&mut self, format: DateFormat) -> Result<()> {
        if self.get(format.key()).is_some() {
            return Err(DateFinderError::InvalidFormat {
                key: format.key().to_string(),
                message: "duplicate key".to_string(),
            });
        }
        self.formats.push(format);
        Ok(())
    }

    /// Look a format up by key.
    pub fn get(&self, key: &str) -> Option<&DateFormat> {
        self.formats.iter().find(|f| f.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateFormat> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Formats of one temporal type, in catalog order.
    pub fn of_type(&self, temporal_type: TemporalType) -> impl Iterator<Item = &DateFormat> {
        self.formats
            .iter()
            .filter(move |f| f.temporal_type() == temporal_type)
    }
}

impl<'a> IntoIterator for &'a FormatCatalog {
    type Item = &'a DateFormat;
    type IntoIter = std::slice::Iter<'a, DateFormat>;

    fn into_iter(self) -> Self::IntoIter {
        self.formats.iter()
    }
}
