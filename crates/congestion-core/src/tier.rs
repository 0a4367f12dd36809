// crates/congestion-core/src/tier.rs

//! # Severity tiers
//!
//! Maps the numeric congestion metric (average taxi-out, minutes) onto five
//! ordered bands plus `Unknown`, and each band onto a circle color, a text
//! color and a marker radius.
//!
//! Thresholds, palette and radii live in [`TierTable`] so a sibling map with
//! a different scale can inject its own table instead of editing code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered congestion band. `Unknown` sorts below everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    Unknown,
    VeryLow,
    Low,
    Average,
    High,
    VeryHigh,
}

impl SeverityTier {
    /// Known tiers from least to most congested.
    pub const BANDS: [SeverityTier; 5] = [
        SeverityTier::VeryLow,
        SeverityTier::Low,
        SeverityTier::Average,
        SeverityTier::High,
        SeverityTier::VeryHigh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Unknown => "Unknown",
            SeverityTier::VeryLow => "Very Low",
            SeverityTier::Low => "Low",
            SeverityTier::Average => "Average",
            SeverityTier::High => "High",
            SeverityTier::VeryHigh => "Very High",
        }
    }

    fn slot(&self) -> usize {
        match self {
            SeverityTier::VeryHigh => 0,
            SeverityTier::High => 1,
            SeverityTier::Average => 2,
            SeverityTier::Low => 3,
            SeverityTier::VeryLow => 4,
            SeverityTier::Unknown => 5,
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tier colors. Index order: Very High, High, Average, Low, Very Low, Unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub circle: [String; 6],
    pub text: [String; 6],
}

impl Default for Palette {
    fn default() -> Self {
        let owned = |xs: [&str; 6]| xs.map(str::to_owned);
        Self {
            circle: owned(["#E53935", "#FFB300", "#9E9E9E", "#90CAF9", "#42A5F5", "#cccccc"]),
            text: owned(["#b71c1c", "#e65100", "#616161", "#2196F3", "#1976D2", "#5e5e5e"]),
        }
    }
}

/// Thresholds + lookup tables for one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    /// Lower bounds (inclusive) of Low, Average, High and Very High.
    pub thresholds: [f64; 4],
    /// Marker radius in px. Index order matches [`Palette`].
    pub radii: [u32; 6],
    pub palette: Palette,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            thresholds: [10.0, 15.0, 20.0, 25.0],
            radii: [14, 12, 10, 8, 6, 6],
            palette: Palette::default(),
        }
    }
}

impl TierTable {
    /// Band for `metric`; `None` and NaN map to [`SeverityTier::Unknown`].
    pub fn tier(&self, metric: Option<f64>) -> SeverityTier {
        let v = match metric {
            Some(v) if !v.is_nan() => v,
            _ => return SeverityTier::Unknown,
        };
        let [low, average, high, very_high] = self.thresholds;
        if v >= very_high {
            SeverityTier::VeryHigh
        } else if v >= high {
            SeverityTier::High
        } else if v >= average {
            SeverityTier::Average
        } else if v >= low {
            SeverityTier::Low
        } else {
            SeverityTier::VeryLow
        }
    }

    pub fn color(&self, tier: SeverityTier) -> &str {
        &self.palette.circle[tier.slot()]
    }

    /// Darker variant used for popup text.
    pub fn text_color(&self, tier: SeverityTier) -> &str {
        &self.palette.text[tier.slot()]
    }

    pub fn radius(&self, tier: SeverityTier) -> u32 {
        self.radii[tier.slot()]
    }
}
