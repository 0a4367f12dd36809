// crates/congestion-core/src/config.rs

//! Injected configuration for one map instance.
//!
//! Every field has a default matching the production air map, so a config
//! file only needs to name what it changes:
//!
//! ```json
//! { "default_view": { "center": { "lat": 40.0, "lng": -100.0 }, "zoom": 5 },
//!   "poll": { "max_checks": 10 } }
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cluster::ClusterOptions;
use crate::jitter::JitterConfig;
use crate::model::{Bounds, LatLng, MapView};
use crate::tier::TierTable;

/// Bounded poll that waits for a marker element after a view animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay before the first readiness check.
    pub initial_delay_ms: u64,
    /// Delay between subsequent checks.
    pub interval_ms: u64,
    /// Readiness checks in total, the first one included, before giving up.
    pub max_checks: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 50,
            interval_ms: 100,
            max_checks: 30,
        }
    }
}

impl PollConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Where the dataset lives (path or URL).
    pub dataset: String,
    /// View restored by "All" and the reset button.
    pub default_view: MapView,
    pub max_bounds: Bounds,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tiers: TierTable,
    pub cluster: ClusterOptions,
    pub jitter: JitterConfig,
    pub poll: PollConfig,
    /// Fraction added on every side of a location's bounding box before fitting.
    pub fit_padding: f64,
    pub error_banner_ttl_ms: u64,
    pub load_error_message: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            dataset: "data/us-air.json".to_string(),
            default_view: MapView {
                center: LatLng::new(37.8, -96.0),
                zoom: 4,
            },
            max_bounds: Bounds {
                south_west: LatLng::new(-85.0, -180.0),
                north_east: LatLng::new(85.0, 180.0),
            },
            min_zoom: 3,
            max_zoom: 18,
            tiers: TierTable::default(),
            cluster: ClusterOptions::default(),
            jitter: JitterConfig::default(),
            poll: PollConfig::default(),
            fit_padding: 0.5,
            error_banner_ttl_ms: 5_000,
            load_error_message: "Failed to load air data. Please try again later.".to_string(),
        }
    }
}

impl MapConfig {
    pub fn error_banner_ttl(&self) -> Duration {
        Duration::from_millis(self.error_banner_ttl_ms)
    }

    /// Max zoom when fitting a location: one past the declustering zoom so
    /// the target is never hidden in a cluster.
    pub fn location_max_zoom(&self) -> u8 {
        self.cluster
            .disable_clustering_at_zoom
            .saturating_add(1)
            .min(self.max_zoom)
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    #[cfg(feature = "json")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::CongestionError::NotFound(format!("Config not found at {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }
}
