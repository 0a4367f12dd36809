// crates/congestion-core/src/marker.rs

//! # Marker renderer
//!
//! Turns records into styled markers. A [`MarkerSet`] is always rebuilt as a
//! whole: there is no diffing, and every [`MarkerId`] handed out by a previous
//! set is invalid once a new one is built.

use serde::{Deserialize, Serialize};

use crate::filter::LocationKey;
use crate::model::{LatLng, LocationRecord};
use crate::popup::popup_content;
use crate::tier::{SeverityTier, TierTable};

/// Index of a marker within the current [`MarkerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub usize);

/// Style callback output: what the host needs to draw the round icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: String,
    pub radius: u32,
    /// `[2r, 2r]`
    pub icon_size: [u32; 2],
    /// `[r, r]`, the icon is centred on the coordinate.
    pub icon_anchor: [u32; 2],
}

impl MarkerStyle {
    pub fn for_tier(tier: SeverityTier, table: &TierTable) -> Self {
        let radius = table.radius(tier);
        Self {
            color: table.color(tier).to_string(),
            radius,
            icon_size: [radius * 2, radius * 2],
            icon_anchor: [radius, radius],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub position: LatLng,
    pub identifier: String,
    pub severity_metric: Option<f64>,
    pub tier: SeverityTier,
    pub style: MarkerStyle,
    pub popup_html: String,
    /// Filter entry of the backing record, if it has one.
    pub location: Option<LocationKey>,
}

impl Marker {
    pub fn from_record(id: MarkerId, record: &LocationRecord, table: &TierTable) -> Self {
        let tier = table.tier(record.severity_metric);
        Self {
            id,
            position: record.position(),
            identifier: record.identifier.clone(),
            severity_metric: record.severity_metric,
            tier,
            style: MarkerStyle::for_tier(tier, table),
            popup_html: popup_content(&[record], table),
            location: record.location_key(),
        }
    }
}

/// All markers of one render pass. Marker `i` is built from record `i`.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn build(records: &[LocationRecord], table: &TierTable) -> Self {
        let markers = records
            .iter()
            .enumerate()
            .map(|(i, r)| Marker::from_record(MarkerId(i), r, table))
            .collect();
        Self { markers }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// First marker whose record matches `key`, in record order.
    pub fn first_for_location<'a>(
        &'a self,
        records: &[LocationRecord],
        key: &LocationKey,
    ) -> Option<&'a Marker> {
        records
            .iter()
            .position(|r| r.matches(key))
            .and_then(|i| self.markers.get(i))
    }
}
