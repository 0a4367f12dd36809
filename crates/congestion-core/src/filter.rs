// crates/congestion-core/src/filter.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CongestionError;
use crate::model::LocationRecord;

/// Dropdown value that resets the map.
pub const ALL_LOCATIONS: &str = "All";

/// Convert a string into a folded key suitable for sorting and comparison.
///
/// Transliterates Unicode to ASCII with `deunicode` and lower-cases the
/// result, so `"Łódź"` and `"lodz"` fold to the same key.
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// A `(municipality, region code)` pair, e.g. `("Los Angeles", "CA")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationKey {
    municipality: String,
    region_code: String,
}

impl LocationKey {
    pub fn new(municipality: impl Into<String>, region_code: impl Into<String>) -> Self {
        Self {
            municipality: municipality.into(),
            region_code: region_code.into(),
        }
    }

    pub fn municipality(&self) -> &str {
        &self.municipality
    }

    pub fn region_code(&self) -> &str {
        &self.region_code
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.municipality, self.region_code)
    }
}

impl FromStr for LocationKey {
    type Err = CongestionError;

    /// Parses the dropdown form `"City, ST"`. Splits on the last `", "` so a
    /// city name containing a comma survives.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (city, code) = s
            .rsplit_once(", ")
            .ok_or_else(|| CongestionError::InvalidLocation(s.to_string()))?;
        let (city, code) = (city.trim(), code.trim());
        if city.is_empty() || code.is_empty() {
            return Err(CongestionError::InvalidLocation(s.to_string()));
        }
        Ok(LocationKey::new(city, code))
    }
}

/// What the location dropdown reports on change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSelection {
    /// The disabled placeholder; nothing to do.
    Placeholder,
    All,
    Location(LocationKey),
}

impl FromStr for FilterSelection {
    type Err = CongestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(FilterSelection::Placeholder),
            ALL_LOCATIONS => Ok(FilterSelection::All),
            other => other.parse().map(FilterSelection::Location),
        }
    }
}

/// Sorted, de-duplicated dropdown entries for `records`.
///
/// Records without a municipality or region are skipped. Ordering is
/// accent- and case-insensitive, ties fall back to the raw text.
pub fn location_options(records: &[LocationRecord]) -> Vec<LocationKey> {
    let unique: BTreeSet<LocationKey> = records
        .iter()
        .filter_map(LocationRecord::location_key)
        .collect();

    let mut keyed: Vec<(String, LocationKey)> = unique
        .into_iter()
        .map(|k| (fold_key(&k.to_string()), k))
        .collect();
    keyed.sort_by(|(fa, a), (fb, b)| fa.cmp(fb).then_with(|| a.cmp(b)));
    keyed.into_iter().map(|(_, k)| k).collect()
}

/// The filter control's own state: the option list and the current value.
#[derive(Debug, Clone, Default)]
pub struct FilterControl {
    options: Vec<LocationKey>,
    selected: Option<FilterSelection>,
}

impl FilterControl {
    pub fn from_records(records: &[LocationRecord]) -> Self {
        Self {
            options: location_options(records),
            selected: None,
        }
    }

    pub fn options(&self) -> &[LocationKey] {
        &self.options
    }

    pub fn selected(&self) -> Option<&FilterSelection> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, selection: FilterSelection) {
        self.selected = match selection {
            FilterSelection::Placeholder => None,
            other => Some(other),
        };
    }

    /// Back to the placeholder entry.
    pub fn clear(&mut self) {
        self.selected = None;
    }
}
