// crates/congestion-core/src/popup.rs
use maud::{html, Markup};

use crate::model::LocationRecord;
use crate::tier::TierTable;

pub const EMPTY_POPUP: &str = "<p>No valid data to display for this location.</p>";

/// Popup HTML for one marker, or for several records shown together
/// (a spiderfied cluster or a whole filter location).
pub fn popup_content(records: &[&LocationRecord], table: &TierTable) -> String {
    if records.is_empty() {
        return EMPTY_POPUP.to_string();
    }

    if records.len() == 1 {
        return location_info(records[0], table).into_string();
    }

    let last = records.len() - 1;
    html! {
        div class="cluster-popup-header" {
            h4 { (records.len()) " Locations" }
            p { "Showing individual details:" }
        }
        div class="cluster-popup-content" {
            @for (i, record) in records.iter().enumerate() {
                (location_info(record, table))
                @if i != last {
                    hr;
                }
            }
        }
    }
    .into_string()
}

fn location_info(record: &LocationRecord, table: &TierTable) -> Markup {
    let tier = table.tier(record.severity_metric);
    let city = record.municipality.as_deref().unwrap_or("Unknown City");
    let region = record.region_code().unwrap_or("N/A");
    let airport = match record.identifier.trim() {
        "" => "Unknown Airport",
        code => code,
    };
    let avg_txo = record
        .severity_metric
        .filter(|v| !v.is_nan())
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "N/A".to_string());

    html! {
        div class="location-info" {
            h5 { (city) ", " (region) }
            p { strong { "Airport:" } " " (airport) }
            p {
                strong { "Congestion Level:" } " "
                span style=(format!("color: {}", table.text_color(tier))) { (tier.label()) }
            }
            p { strong { "Average Taxi-Out:" } " " (avg_txo) " min" }
            p { strong { "Scheduled Flights:" } " " (display_number(record.scheduled_count)) }
            p { strong { "Departed Flights:" } " " (display_number(record.departed_count)) }
            p { strong { "Completion Factor:" } " " (display_number(record.completion_factor)) "%" }
        }
    }
}

/// Whole numbers without a fraction, `N/A` when missing.
pub fn display_number(v: Option<f64>) -> String {
    match v {
        Some(n) if n.is_finite() && n.fract() == 0.0 => format!("{}", n as i64),
        Some(n) if n.is_finite() => format!("{n}"),
        _ => "N/A".to_string(),
    }
}
