// crates/congestion-core/src/lib.rs

//! # congestion-core
//!
//! Marker lifecycle and popup coordination for the air traffic congestion
//! map. The crate does not draw anything: it loads and normalizes the
//! airport dataset, decides how every marker and cluster badge looks, and
//! tells a [`MapHost`] (the actual map widget) what to do in response to
//! hovers, clicks, filter changes and finished animations.
//!
//! ```no_run
//! use congestion_core::prelude::*;
//!
//! let mut rng = rand::thread_rng();
//! let config = MapConfig::default();
//! let dataset = Dataset::load(&config.dataset, &config.jitter, &mut rng)?;
//! for marker in MarkerSet::build(&dataset.records, &config.tiers).iter() {
//!     println!("{} {} r={}", marker.identifier, marker.style.color, marker.style.radius);
//! }
//! # Ok::<(), congestion_core::CongestionError>(())
//! ```

pub mod cluster;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod jitter;
pub mod loader;
pub mod marker;
pub mod model;
pub mod popup;
pub mod tier;

// Re-exports
pub use crate::cluster::{cluster_badge, ClusterBadge, ClusterOptions};
pub use crate::config::{MapConfig, PollConfig};
pub use crate::coordinator::{AirCongestionMap, MapEvent, MapHost, PollTicket};
pub use crate::error::{CongestionError, Result};
pub use crate::filter::{location_options, FilterControl, FilterSelection, LocationKey};
pub use crate::jitter::{jitter_duplicates, JitterConfig};
pub use crate::loader::{Dataset, LoadReport};
pub use crate::marker::{Marker, MarkerId, MarkerSet, MarkerStyle};
pub use crate::model::{Bounds, LatLng, LocationRecord, MapView};
pub use crate::tier::{SeverityTier, TierTable};

pub mod prelude {
    pub use crate::{
        cluster_badge, AirCongestionMap, Bounds, ClusterBadge, CongestionError, Dataset,
        FilterSelection, LatLng, LocationKey, LocationRecord, MapConfig, MapEvent, MapHost,
        MapView, Marker, MarkerId, MarkerSet, Result, SeverityTier, TierTable,
    };
}
