//! Basic usage example for congestion-map
//!
//! This example demonstrates how to:
//! - Load and normalize the bundled `data/us-air.json`
//! - Style markers by congestion level
//! - Build the location dropdown and a popup
//! - Compute a cluster badge

use congestion_map::prelude::*;
use congestion_map::popup::popup_content;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    println!("=== Congestion Map Basic Usage Example ===\n");

    let config = MapConfig::default();
    let mut rng = StdRng::seed_from_u64(42);

    println!("Loading {}...", config.dataset);
    let dataset = Dataset::load(&config.dataset, &config.jitter, &mut rng)?;
    let report = dataset.report;
    println!(
        "✓ {} rows, {} markers, {} dropped, {} jittered\n",
        report.total, report.accepted, report.dropped, report.jittered
    );

    println!("--- Example 1: Markers by congestion level ---");
    let markers = MarkerSet::build(&dataset.records, &config.tiers);
    for m in markers.iter().take(6) {
        println!(
            "{:<5} {:<10} {} r={}",
            m.identifier,
            m.tier.label(),
            m.style.color,
            m.style.radius
        );
    }
    println!("... and {} more\n", markers.len().saturating_sub(6));

    println!("--- Example 2: Location dropdown ---");
    let options = congestion_map::location_options(&dataset.records);
    for key in &options {
        println!("- {key}");
    }
    println!();

    println!("--- Example 3: Popup for New York, NY ---");
    let key: LocationKey = "New York, NY".parse()?;
    let members: Vec<_> = dataset.records.iter().filter(|r| r.matches(&key)).collect();
    println!("{}\n", popup_content(&members, &config.tiers));

    println!("--- Example 4: Cluster badge for the New York area ---");
    let metrics = dataset
        .records
        .iter()
        .filter(|r| ["JFK", "LGA", "EWR"].contains(&r.identifier.as_str()))
        .map(|r| r.severity_metric);
    let badge = cluster_badge(metrics, &config.tiers, &config.cluster);
    println!(
        "{} members, level {}, color {}, {}px",
        badge.count, badge.tier, badge.color, badge.size
    );

    Ok(())
}
