// crates/congestion-core/src/cluster.rs
use serde::{Deserialize, Serialize};

use crate::tier::{SeverityTier, TierTable};

/// Options handed to the external clustering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    /// Pixel radius for grouping.
    pub max_cluster_radius: u32,
    /// From this zoom on every marker is shown individually.
    pub disable_clustering_at_zoom: u8,
    pub spiderfy_on_max_zoom: bool,
    pub spiderfy_distance_multiplier: f64,
    /// Badge size: `base_size + min(count * size_per_member, max_extra_size)`.
    pub base_size: f64,
    pub size_per_member: f64,
    pub max_extra_size: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            max_cluster_radius: 40,
            disable_clustering_at_zoom: 9,
            spiderfy_on_max_zoom: true,
            spiderfy_distance_multiplier: 2.0,
            base_size: 30.0,
            size_per_member: 0.5,
            max_extra_size: 30.0,
        }
    }
}

/// Cluster icon: colored disc labeled with the member count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterBadge {
    pub color: String,
    /// Tier of the worst member; `Average` when nobody has a metric.
    pub tier: SeverityTier,
    /// Index (in iteration order) of the member that picked the color.
    pub dominant: Option<usize>,
    pub count: usize,
    /// Width and height in px.
    pub size: f64,
}

/// Picks the badge for a group of members, given each member's metric.
///
/// The member with the numerically highest metric wins. Comparison is
/// strict, so on an exact tie the first one seen keeps the badge; the
/// collaborator's iteration order therefore matters. Missing and NaN metrics
/// never win.
pub fn cluster_badge<I>(metrics: I, table: &TierTable, options: &ClusterOptions) -> ClusterBadge
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut best: Option<(usize, f64)> = None;
    let mut count = 0;

    for (idx, metric) in metrics.into_iter().enumerate() {
        count += 1;
        let Some(v) = metric.filter(|v| !v.is_nan()) else {
            continue;
        };
        match best {
            Some((_, top)) if v > top => best = Some((idx, v)),
            None => best = Some((idx, v)),
            _ => {}
        }
    }

    let tier = match best {
        Some((_, v)) => table.tier(Some(v)),
        None => SeverityTier::Average,
    };
    let size = options.base_size + (count as f64 * options.size_per_member).min(options.max_extra_size);

    ClusterBadge {
        color: table.color(tier).to_string(),
        tier,
        dominant: best.map(|(idx, _)| idx),
        count,
        size,
    }
}
