mod common;

use common::record;
use congestion_core::model::records_center;
use congestion_core::{
    jitter_duplicates, location_options, Bounds, CongestionError, Dataset, FilterSelection,
    JitterConfig, LatLng, LocationKey, MapConfig, SeverityTier, TierTable,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;

const SAMPLE: &str = r#"[
  {"latitude_deg": 33.94, "longitude_deg": -118.41, "airport_code": "LAX",
   "name": "Los Angeles International", "municipality": "Los Angeles", "iso_region": "US-CA",
   "average_txo": 27.1, "scheduled": 512, "departed": 498, "completion_factor": 97.3,
   "d15": 12, "last_updated": "2024-05-01"},
  {"latitude_deg": "40.64", "longitude_deg": -73.78, "airport_code": "JFK"},
  {"latitude_deg": 41.97, "longitude_deg": -87.91, "airport_code": "  "},
  {"latitude_deg": 40.77, "longitude_deg": -73.87, "airport_code": "LGA",
   "municipality": "New York", "iso_region": "US-NY", "average_txo": "18.25", "scheduled": null},
  {"longitude_deg": -80.0, "airport_code": "MIA"}
]"#;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("congestion-core-{}-{name}", std::process::id()))
}

#[test]
fn invalid_rows_are_dropped_not_fatal() {
    let data = Dataset::from_json_str(SAMPLE, &JitterConfig::default(), &mut rng()).unwrap();

    let codes: Vec<_> = data.records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(codes, ["LAX", "LGA"]);
    assert_eq!(data.report.total, 5);
    assert_eq!(data.report.accepted, 2);
    assert_eq!(data.report.dropped, 3);
    assert_eq!(data.report.jittered, 0);
}

#[test]
fn raw_keys_map_onto_record_fields() {
    let data = Dataset::from_json_str(SAMPLE, &JitterConfig::default(), &mut rng()).unwrap();
    let lax = &data.records[0];

    assert_eq!(lax.position(), LatLng::new(33.94, -118.41));
    assert_eq!(lax.name.as_deref(), Some("Los Angeles International"));
    assert_eq!(lax.region_code(), Some("CA"));
    assert_eq!(lax.severity_metric, Some(27.1));
    assert_eq!(lax.scheduled_count, Some(512.0));
    assert_eq!(lax.departed_count, Some(498.0));
    assert_eq!(lax.completion_factor, Some(97.3));
    assert_eq!(lax.last_updated.as_deref(), Some("2024-05-01"));

    let lga = &data.records[1];
    assert_eq!(lga.severity_metric, Some(18.25));
    assert_eq!(lga.scheduled_count, None);
}

#[test]
fn numeric_strings_read_like_a_browser_would() {
    let text = r#"[
      {"latitude_deg": 1, "longitude_deg": 1, "airport_code": "AAA", "average_txo": "inf"},
      {"latitude_deg": 2, "longitude_deg": 2, "airport_code": "BBB", "average_txo": "Infinity"},
      {"latitude_deg": 3, "longitude_deg": 3, "airport_code": "CCC", "average_txo": "1e999"},
      {"latitude_deg": 4, "longitude_deg": 4, "airport_code": "DDD", "average_txo": "NaN"},
      {"latitude_deg": 5, "longitude_deg": 5, "airport_code": "EEE", "average_txo": " 12 min"},
      {"latitude_deg": 6, "longitude_deg": 6, "airport_code": "FFF", "average_txo": "-.5e1x"},
      {"latitude_deg": 7, "longitude_deg": 7, "airport_code": "GGG", "average_txo": "min 12"},
      {"latitude_deg": 8, "longitude_deg": 8, "airport_code": "HHH", "completion_factor": "97.5%"}
    ]"#;
    let data = Dataset::from_json_str(text, &JitterConfig::default(), &mut rng()).unwrap();
    let metrics: Vec<_> = data.records.iter().map(|r| r.severity_metric).collect();

    assert_eq!(
        metrics,
        [None, None, None, None, Some(12.0), Some(-5.0), None, None]
    );
    assert_eq!(data.records[7].completion_factor, Some(97.5));
    assert_eq!(
        TierTable::default().tier(data.records[0].severity_metric),
        SeverityTier::Unknown
    );
}

#[test]
fn malformed_payload_is_an_error() {
    let err = Dataset::from_json_str("{\"not\": \"an array\"}", &JitterConfig::default(), &mut rng())
        .unwrap_err();
    assert!(matches!(err, CongestionError::Json(_)));
}

#[test]
fn missing_file_is_not_found() {
    let err = Dataset::load("no/such/us-air.json", &JitterConfig::default(), &mut rng()).unwrap_err();
    assert!(matches!(err, CongestionError::NotFound(_)));
}

#[test]
fn loads_plain_and_gzipped_files() {
    let plain = temp_path("us-air.json");
    std::fs::write(&plain, SAMPLE).unwrap();

    let gz = temp_path("us-air.json.gz");
    let mut enc = flate2::write::GzEncoder::new(
        std::fs::File::create(&gz).unwrap(),
        flate2::Compression::default(),
    );
    enc.write_all(SAMPLE.as_bytes()).unwrap();
    enc.finish().unwrap();

    let cfg = JitterConfig::default();
    let a = Dataset::load(plain.to_str().unwrap(), &cfg, &mut rng()).unwrap();
    let b = Dataset::load(gz.to_str().unwrap(), &cfg, &mut rng()).unwrap();
    assert_eq!(a.records, b.records);
    assert_eq!(b.report.accepted, 2);

    let _ = std::fs::remove_file(plain);
    let _ = std::fs::remove_file(gz);
}

#[test]
fn co_located_records_are_spread_apart() {
    let origin = LatLng::new(40.0, -75.0);
    let mut records = vec![
        record("AAA", 40.0, -75.0, "Philadelphia", "US-PA", Some(5.0)),
        record("BBB", 40.0, -75.0, "Philadelphia", "US-PA", Some(15.0)),
        record("CCC", 40.0, -75.0, "Philadelphia", "US-PA", Some(25.0)),
        record("DDD", 41.0, -75.0, "Scranton", "US-PA", Some(25.0)),
    ];
    let cfg = JitterConfig::default();

    let moved = jitter_duplicates(&mut records, &cfg, &mut rng());

    assert_eq!(moved, 3);
    for (i, a) in records[..3].iter().enumerate() {
        let d = a.position().degree_distance(&origin);
        assert!(d > 0.0 && d <= cfg.scale + 1e-12, "{} at distance {d}", a.identifier);
        for b in &records[i + 1..3] {
            assert_ne!(a.position(), b.position());
        }
    }
    assert_eq!(records[3].position(), LatLng::new(41.0, -75.0));
    // Only coordinates change.
    assert_eq!(records[1].identifier, "BBB");
    assert_eq!(records[1].severity_metric, Some(15.0));
}

#[test]
fn jitter_is_reproducible_with_a_seed() {
    let base = vec![
        record("AAA", 10.0, 10.0, "X", "US-XX", None),
        record("BBB", 10.0, 10.0, "X", "US-XX", None),
    ];
    let (mut a, mut b) = (base.clone(), base);
    jitter_duplicates(&mut a, &JitterConfig::default(), &mut rng());
    jitter_duplicates(&mut b, &JitterConfig::default(), &mut rng());
    assert_eq!(a, b);
}

#[test]
fn non_positive_scale_disables_jitter() {
    let mut records = vec![
        record("AAA", 10.0, 10.0, "X", "US-XX", None),
        record("BBB", 10.0, 10.0, "X", "US-XX", None),
    ];
    let cfg = JitterConfig {
        scale: 0.0,
        ..JitterConfig::default()
    };
    assert_eq!(jitter_duplicates(&mut records, &cfg, &mut rng()), 0);
    assert_eq!(records[0].position(), records[1].position());
}

#[test]
fn non_finite_min_fraction_falls_back_to_default() {
    let mut records = vec![
        record("AAA", 10.0, 10.0, "X", "US-XX", None),
        record("BBB", 10.0, 10.0, "X", "US-XX", None),
    ];
    let cfg = JitterConfig {
        min_fraction: f64::NAN,
        ..JitterConfig::default()
    };

    assert_eq!(jitter_duplicates(&mut records, &cfg, &mut rng()), 2);
    let origin = LatLng::new(10.0, 10.0);
    for r in &records {
        let d = r.position().degree_distance(&origin);
        assert!(d >= 0.05 * cfg.scale - 1e-12 && d <= cfg.scale + 1e-12, "distance {d}");
    }
    assert_ne!(records[0].position(), records[1].position());
}

#[test]
fn location_options_are_unique_and_folded_sorted() {
    let mut records = common::sample_records();
    records.push(record("ZZZ", 1.0, 1.0, "Ángel Fire", "US-NM", None));
    records.push(record("BOS", 1.0, 1.0, "boston", "US-MA", None));
    let mut nameless = record("QQQ", 1.0, 1.0, "", "US-MA", None);
    nameless.municipality = Some("   ".into());
    records.push(nameless);

    let shown: Vec<String> = location_options(&records).iter().map(|k| k.to_string()).collect();
    assert_eq!(
        shown,
        ["Ángel Fire, NM", "boston, MA", "Chicago, IL", "Los Angeles, CA", "New York, NY"]
    );
}

#[test]
fn filter_values_parse() {
    assert_eq!("".parse::<FilterSelection>().unwrap(), FilterSelection::Placeholder);
    assert_eq!("All".parse::<FilterSelection>().unwrap(), FilterSelection::All);
    assert_eq!(
        "Washington, D.C., DC".parse::<FilterSelection>().unwrap(),
        FilterSelection::Location(LocationKey::new("Washington, D.C.", "DC"))
    );
    assert!(matches!(
        "Nowhere".parse::<FilterSelection>(),
        Err(CongestionError::InvalidLocation(_))
    ));
}

#[test]
fn record_matching_requires_city_and_region_suffix() {
    let r = record("JFK", 0.0, 0.0, "New York", "US-NY", None);
    assert!(r.matches(&LocationKey::new("New York", "NY")));
    assert!(!r.matches(&LocationKey::new("New York", "NJ")));
    assert!(!r.matches(&LocationKey::new("New Yorks", "NY")));
}

#[test]
fn partial_config_keeps_defaults() {
    let cfg = MapConfig::from_json_str(
        r#"{"poll": {"max_checks": 10}, "tiers": {"thresholds": [5, 10, 15, 20]}}"#,
    )
    .unwrap();

    assert_eq!(cfg.poll.max_checks, 10);
    assert_eq!(cfg.poll.interval_ms, 100);
    assert_eq!(cfg.tiers.thresholds, [5.0, 10.0, 15.0, 20.0]);
    assert_eq!(cfg.tiers.radii, [14, 12, 10, 8, 6, 6]);
    assert_eq!(cfg.default_view.zoom, 4);
    assert_eq!(cfg.location_max_zoom(), 10);
    assert_eq!(cfg.error_banner_ttl().as_millis(), 5000);
}

#[test]
fn padded_bounds_and_center() {
    let b = Bounds::from_points([LatLng::new(40.0, -74.0), LatLng::new(41.0, -72.0)]).unwrap();
    let padded = b.pad(0.5);
    assert_eq!(padded.south_west, LatLng::new(39.5, -75.0));
    assert_eq!(padded.north_east, LatLng::new(41.5, -71.0));
    assert!(padded.contains(&LatLng::new(39.6, -74.9)));
    assert!(!b.contains(&LatLng::new(39.6, -74.9)));
    assert!(Bounds::from_points(std::iter::empty()).is_none());

    let fallback = LatLng::new(37.8, -96.0);
    assert_eq!(records_center(&[], fallback), fallback);
    let records = vec![
        record("AAA", 30.0, -100.0, "A", "US-TX", None),
        record("BBB", 40.0, -80.0, "B", "US-PA", None),
    ];
    assert_eq!(records_center(&records, fallback), LatLng::new(35.0, -90.0));
}
