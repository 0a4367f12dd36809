//! congestion-cli
//! ==============
//!
//! Command-line inspector for the air traffic congestion map.
//!
//! This crate primarily provides a binary (`congestion`). The library
//! target only exists so the overview below is rendered as a documentation
//! page.
//!
//! Basic usage:
//!
//! ```text
//! congestion --help
//! congestion summary
//! congestion --seed 7 markers --geojson > markers.geojson
//! congestion locations
//! congestion popup "New York, NY"
//! congestion cluster JFK LGA EWR
//! ```
//!
//! For programmatic access use the `congestion-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
