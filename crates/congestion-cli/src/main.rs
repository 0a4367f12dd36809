//! congestion-cli: inspect the congestion dataset from a terminal
//!
//! Loads `us-air.json` (or a `.json.gz`, or an http(s) URL) through the same
//! pipeline as the map: rows without a position or airport code are dropped,
//! co-located airports are jittered, and every marker gets its tier color
//! and radius.
//!
//! Usage examples
//! --------------
//!
//! - Load counts and a per-level histogram
//!   $ congestion summary
//!
//! - Markers as a table, or as GeoJSON for any map viewer
//!   $ congestion markers
//!   $ congestion --seed 1 markers --geojson
//!
//! - The filter dropdown and one location's popup
//!   $ congestion locations
//!   $ congestion popup "Chicago, IL"
//!
//! - Which badge a cluster of airports would show
//!   $ congestion cluster JFK LGA EWR
//!
//! Logging goes to stderr; `-v`/`-vv` or `RUST_LOG` raise the level.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use congestion_core::model::records_center;
use congestion_core::{
    cluster_badge, popup::popup_content, Dataset, LocationKey, MapConfig, MarkerSet, SeverityTier,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => MapConfig::from_path(path).with_context(|| format!("reading config {path}"))?,
        None => MapConfig::default(),
    };
    let source = args.input.clone().unwrap_or_else(|| config.dataset.clone());

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = Dataset::load(&source, &config.jitter, &mut rng)
        .with_context(|| format!("loading dataset from {source}"))?;
    let markers = MarkerSet::build(&dataset.records, &config.tiers);

    match args.command {
        Commands::Summary => {
            let report = dataset.report;
            println!("Dataset: {source}");
            println!("  Rows: {}", report.total);
            println!("  Markers: {}", report.accepted);
            println!("  Dropped: {}", report.dropped);
            println!("  Jittered: {}", report.jittered);
            println!("  Locations: {}", congestion_core::location_options(&dataset.records).len());
            let center = records_center(&dataset.records, config.default_view.center);
            println!("  Center: {:.4}, {:.4}", center.lat, center.lng);
            let outside = dataset
                .records
                .iter()
                .filter(|r| !config.max_bounds.contains(&r.position()))
                .count();
            if outside > 0 {
                println!("  Outside map bounds: {outside}");
            }
            println!("Congestion levels:");
            for tier in SeverityTier::BANDS.iter().rev().chain(std::iter::once(&SeverityTier::Unknown)) {
                let n = markers.iter().filter(|m| m.tier == *tier).count();
                println!("  {:<10} {:>5}  {}", tier.label(), n, config.tiers.color(*tier));
            }
        }

        Commands::Markers { geojson: false } => {
            for m in markers.iter() {
                let metric = m
                    .severity_metric
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "N/A".to_string());
                println!(
                    "{:<5} {:>9.4} {:>10.4}  {:>7}  {:<10} {} r={}",
                    m.identifier,
                    m.position.lat,
                    m.position.lng,
                    metric,
                    m.tier.label(),
                    m.style.color,
                    m.style.radius
                );
            }
        }

        Commands::Markers { geojson: true } => {
            let features: Vec<_> = markers
                .iter()
                .map(|m| {
                    json!({
                        "type": "Feature",
                        "geometry": {
                            "type": "Point",
                            "coordinates": [m.position.lng, m.position.lat],
                        },
                        "properties": {
                            "airport_code": m.identifier,
                            "average_txo": m.severity_metric,
                            "level": m.tier.label(),
                            "marker-color": m.style.color,
                            "radius": m.style.radius,
                            "location": m.location.as_ref().map(ToString::to_string),
                        },
                    })
                })
                .collect();
            let collection = json!({ "type": "FeatureCollection", "features": features });
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }

        Commands::Locations => {
            for key in congestion_core::location_options(&dataset.records) {
                println!("{key}");
            }
        }

        Commands::Popup { location } => {
            let key: LocationKey = location.parse()?;
            let members: Vec<_> = dataset.records.iter().filter(|r| r.matches(&key)).collect();
            if members.is_empty() {
                bail!("No airports found for: {key}");
            }
            println!("{}", popup_content(&members, &config.tiers));
        }

        Commands::Cluster { codes } => {
            let mut metrics = Vec::with_capacity(codes.len());
            for code in &codes {
                let record = dataset
                    .records
                    .iter()
                    .find(|r| r.identifier.eq_ignore_ascii_case(code))
                    .with_context(|| format!("airport {code} not in dataset"))?;
                metrics.push(record.severity_metric);
            }
            let badge = cluster_badge(metrics, &config.tiers, &config.cluster);
            println!("Members: {}", badge.count);
            println!("Level: {}", badge.tier.label());
            println!("Color: {}", badge.color);
            println!("Size: {}px", badge.size);
            match badge.dominant {
                Some(i) => println!("Set by: {}", codes[i].to_uppercase()),
                None => println!("Set by: nobody has a metric, using the default"),
            }
        }
    }

    Ok(())
}
