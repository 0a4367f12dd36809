// crates/congestion-core/src/model.rs
use serde::{Deserialize, Deserializer, Serialize};

use crate::filter::LocationKey;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance in degrees. Only meaningful for the tiny offsets
    /// produced by jittering.
    pub fn degree_distance(&self, other: &LatLng) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }
}

/// Axis-aligned lat/lng rectangle (south-west / north-east corners).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest rectangle containing every point, `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }

    /// Grows every side by `ratio` times the current span (Leaflet's `pad`).
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lng_buffer = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        Bounds {
            south_west: LatLng::new(
                self.south_west.lat - lat_buffer,
                self.south_west.lng - lng_buffer,
            ),
            north_east: LatLng::new(
                self.north_east.lat + lat_buffer,
                self.north_east.lng + lng_buffer,
            ),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn contains(&self, p: &LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }
}

/// Map center plus zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

// -----------------------------------------------------------------------------
// RAW INPUT
// -----------------------------------------------------------------------------

/// One row of `us-air.json` as written by the export script.
///
/// Every field is optional at this level; a row that lacks a usable position
/// or airport code is dropped during normalization instead of failing the
/// whole document. Unknown keys (`d15`, `cancelled`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportRaw {
    #[serde(default, deserialize_with = "strict_number")]
    pub latitude_deg: Option<f64>,
    #[serde(default, deserialize_with = "strict_number")]
    pub longitude_deg: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    pub airport_code: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub municipality: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub iso_region: Option<String>,
    /// Average taxi-out in minutes. May arrive as a number or a numeric string.
    #[serde(default, deserialize_with = "lenient_number")]
    pub average_txo: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub scheduled: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub departed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub completion_factor: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    pub last_updated: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts only JSON numbers; anything else becomes `None`.
fn strict_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Loose::deserialize(d)? {
        Loose::Number(n) => Some(n),
        _ => None,
    })
}

/// Numbers and numeric strings; blank or garbage strings become `None`.
fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Loose::deserialize(d)? {
        Loose::Number(n) => Some(n),
        Loose::Text(s) => leading_number(&s),
        Loose::Other(_) => None,
    })
}

/// The decimal number a string starts with, ignoring anything after it
/// (`"12 min"` is 12). Words like `inf` or `NaN` and overflowing values give
/// `None`.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Loose::deserialize(d)? {
        Loose::Text(s) => Some(s),
        _ => None,
    })
}

// -----------------------------------------------------------------------------
// DOMAIN MODEL
// -----------------------------------------------------------------------------

/// A normalized airport entry, owned by the map for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Airport code, never blank.
    pub identifier: String,
    pub name: Option<String>,
    pub municipality: Option<String>,
    /// ISO 3166-2 region such as `US-CA`.
    pub region: Option<String>,
    /// Average taxi-out time in minutes; drives the severity tier.
    pub severity_metric: Option<f64>,
    pub scheduled_count: Option<f64>,
    pub departed_count: Option<f64>,
    pub completion_factor: Option<f64>,
    pub last_updated: Option<String>,
}

impl LocationRecord {
    /// Validates a raw row. Returns `None` when the position is not numeric
    /// or the airport code is blank.
    pub fn from_raw(raw: AirportRaw) -> Option<Self> {
        let latitude = raw.latitude_deg.filter(|v| v.is_finite())?;
        let longitude = raw.longitude_deg.filter(|v| v.is_finite())?;
        let identifier = raw.airport_code.filter(|c| !c.trim().is_empty())?;

        Some(Self {
            latitude,
            longitude,
            identifier,
            name: raw.name,
            municipality: raw.municipality,
            region: raw.iso_region,
            severity_metric: raw.average_txo,
            scheduled_count: raw.scheduled,
            departed_count: raw.departed,
            completion_factor: raw.completion_factor,
            last_updated: raw.last_updated,
        })
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Region suffix after the last `-` (`US-CA` -> `CA`).
    pub fn region_code(&self) -> Option<&str> {
        self.region
            .as_deref()
            .and_then(|r| r.rsplit('-').next())
            .filter(|code| !code.is_empty())
    }

    /// The filter entry this record belongs to, if it has a city and region.
    pub fn location_key(&self) -> Option<LocationKey> {
        let municipality = self.municipality.as_deref()?.trim();
        let region = self.region.as_deref()?.trim();
        if municipality.is_empty() || region.is_empty() {
            return None;
        }
        let code = self.region_code()?.trim();
        Some(LocationKey::new(municipality, code))
    }

    /// Same city, and a region ending in `-{code}`.
    pub fn matches(&self, key: &LocationKey) -> bool {
        let same_city = self.municipality.as_deref().map(str::trim) == Some(key.municipality());
        let same_region = self
            .region
            .as_deref()
            .is_some_and(|r| r.trim().ends_with(&format!("-{}", key.region_code())));
        same_city && same_region
    }
}

/// Midpoint of the bounding box of `records`, or `fallback` when empty.
pub fn records_center(records: &[LocationRecord], fallback: LatLng) -> LatLng {
    Bounds::from_points(records.iter().map(LocationRecord::position))
        .map(|b| b.center())
        .unwrap_or(fallback)
}
