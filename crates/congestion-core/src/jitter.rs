// crates/congestion-core/src/jitter.rs

//! Declutters co-located markers.
//!
//! Records that share an exact coordinate are spread evenly around a small
//! circle centred on that coordinate. Member `i` of a group of `k` sits at
//! angle `2π·i/k`, at a random fraction of the jitter radius. The original
//! coordinates are overwritten; this is cosmetic and one-way.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::model::{LatLng, LocationRecord};

/// Redraws allowed when a candidate lands on the origin or a sibling.
const MAX_DRAWS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Circle radius in degrees.
    pub scale: f64,
    /// Lower bound of the random radius fraction, in `(0, 1)`.
    pub min_fraction: f64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            scale: 0.15,
            min_fraction: 0.05,
        }
    }
}

/// Spreads every group of identical coordinates. Returns how many records moved.
///
/// Group order follows first appearance in `records`, members keep their
/// relative order. Singletons are untouched.
pub fn jitter_duplicates<R: Rng + ?Sized>(
    records: &mut [LocationRecord],
    config: &JitterConfig,
    rng: &mut R,
) -> usize {
    // Exact bit patterns, so 40.0 and 40.000001 stay separate groups.
    let mut groups: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    let mut order: Vec<(u64, u64)> = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let key = (record.latitude.to_bits(), record.longitude.to_bits());
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(idx);
    }

    if !(config.scale.is_finite() && config.scale > 0.0) {
        tracing::warn!(scale = config.scale, "jitter disabled: scale must be positive");
        return 0;
    }
    let min_fraction = if config.min_fraction.is_finite() {
        config.min_fraction.clamp(f64::EPSILON, 1.0 - f64::EPSILON)
    } else {
        let fallback = JitterConfig::default().min_fraction;
        tracing::warn!(min_fraction = config.min_fraction, fallback, "jitter min_fraction must be finite");
        fallback
    };
    let mut moved = 0;

    for key in order {
        let members = &groups[&key];
        if members.len() < 2 {
            continue;
        }
        let origin = records[members[0]].position();
        let k = members.len() as f64;
        let mut placed: Vec<LatLng> = Vec::with_capacity(members.len());

        for (i, &idx) in members.iter().enumerate() {
            let angle = (i as f64 / k) * TAU;
            let mut point = origin;
            for _ in 0..MAX_DRAWS {
                let fraction = rng.gen_range(min_fraction..1.0);
                point = LatLng::new(
                    origin.lat + angle.cos() * config.scale * fraction,
                    origin.lng + angle.sin() * config.scale * fraction,
                );
                if point != origin && !placed.contains(&point) {
                    break;
                }
            }
            placed.push(point);
            records[idx].latitude = point.lat;
            records[idx].longitude = point.lng;
            moved += 1;
        }
    }

    if moved > 0 {
        tracing::debug!(moved, "jittered co-located markers");
    }
    moved
}
