// crates/congestion-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (file, gzip, HTTP) and turns the raw JSON array
//! into validated, jittered [`LocationRecord`]s.
//!
//! Loading is all-or-nothing: any transport or parse failure returns an error
//! and no records, so the caller can keep whatever it rendered before.

use rand::Rng;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::jitter::{jitter_duplicates, JitterConfig};
use crate::model::{AirportRaw, LocationRecord};

pub mod common_io;
#[cfg(feature = "fetch")]
mod fetch;

/// Counts from one load, for logs and the CLI summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows in the source array.
    pub total: usize,
    pub accepted: usize,
    /// Rows without numeric coordinates or an airport code.
    pub dropped: usize,
    /// Accepted rows moved off a shared coordinate.
    pub jittered: usize,
}

/// The normalized content of one dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<LocationRecord>,
    pub report: LoadReport,
}

impl Dataset {
    /// Validates raw rows and declutters shared coordinates.
    pub fn from_raw<R: Rng + ?Sized>(raw: Vec<AirportRaw>, jitter: &JitterConfig, rng: &mut R) -> Self {
        let total = raw.len();
        let mut records = Vec::with_capacity(total);

        for (row, item) in raw.into_iter().enumerate() {
            let code = item.airport_code.clone();
            match LocationRecord::from_raw(item) {
                Some(record) => records.push(record),
                None => tracing::debug!(row, ?code, "dropping record without position or airport code"),
            }
        }

        let jittered = jitter_duplicates(&mut records, jitter, rng);
        let report = LoadReport {
            total,
            accepted: records.len(),
            dropped: total - records.len(),
            jittered,
        };
        tracing::info!(
            total = report.total,
            accepted = report.accepted,
            dropped = report.dropped,
            jittered = report.jittered,
            "dataset loaded"
        );

        Self { records, report }
    }

    /// Parses a JSON array of raw records from any reader.
    #[cfg(feature = "json")]
    pub fn from_reader<R, G>(reader: R, jitter: &JitterConfig, rng: &mut G) -> Result<Self>
    where
        R: std::io::Read,
        G: Rng + ?Sized,
    {
        let raw: Vec<AirportRaw> = serde_json::from_reader(reader)?;
        Ok(Self::from_raw(raw, jitter, rng))
    }

    #[cfg(feature = "json")]
    pub fn from_json_str<G: Rng + ?Sized>(text: &str, jitter: &JitterConfig, rng: &mut G) -> Result<Self> {
        let raw: Vec<AirportRaw> = serde_json::from_str(text)?;
        Ok(Self::from_raw(raw, jitter, rng))
    }

    /// Reads a local `.json` or `.json.gz` file.
    #[cfg(feature = "json")]
    pub fn load_from_path<G: Rng + ?Sized>(
        path: impl AsRef<Path>,
        jitter: &JitterConfig,
        rng: &mut G,
    ) -> Result<Self> {
        let reader = common_io::open_stream(path.as_ref())?;
        Self::from_reader(reader, jitter, rng)
    }

    /// Loads from an `http(s)://` URL or, failing that prefix, a file path.
    #[cfg(feature = "json")]
    pub fn load<G: Rng + ?Sized>(source: &str, jitter: &JitterConfig, rng: &mut G) -> Result<Self> {
        if is_url(source) {
            #[cfg(feature = "fetch")]
            {
                let reader = fetch::fetch(source)?;
                return Self::from_reader(reader, jitter, rng);
            }
            #[cfg(not(feature = "fetch"))]
            {
                return Err(crate::CongestionError::InvalidData(format!(
                    "cannot load {source}: the 'fetch' feature is disabled"
                )));
            }
        }
        Self::load_from_path(source, jitter, rng)
    }
}

pub fn is_url(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
