// crates/congestion-core/src/loader/fetch.rs

// ---------------------------------------------------------------------------
// FILE GUARD: only compiled with the 'fetch' feature.
// ---------------------------------------------------------------------------
#![cfg(feature = "fetch")]

use crate::error::{CongestionError, Result};
use std::io::Read;

/// Single GET, no retry. A non-2xx status is an error; the body is never
/// partially parsed.
pub fn fetch(url: &str) -> Result<Box<dyn Read>> {
    tracing::debug!(url, "fetching dataset");
    let response = reqwest::blocking::get(url)?;

    let status = response.status();
    if !status.is_success() {
        return Err(CongestionError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response.bytes()?;
    let body: Box<dyn Read> = Box::new(std::io::Cursor::new(bytes));

    #[cfg(feature = "compact")]
    if url.ends_with(".gz") {
        return Ok(Box::new(flate2::read::GzDecoder::new(body)));
    }

    Ok(body)
}
