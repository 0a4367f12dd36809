use clap::{ArgAction, Parser, Subcommand};

/// CLI arguments for congestion-cli
#[derive(Debug, Parser)]
#[command(
    name = "congestion",
    version,
    about = "Inspect the air traffic congestion dataset the way the map renders it"
)]
pub struct CliArgs {
    /// Dataset path or http(s) URL (default: the `dataset` entry of the config)
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<String>,

    /// Optional JSON map config; missing keys keep their defaults
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Seed for the co-location jitter, for reproducible output
    #[arg(short = 's', long = "seed", global = true)]
    pub seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show load counts and how many airports fall into each congestion level
    Summary,

    /// List every marker with its level, color and radius
    Markers {
        /// Print a GeoJSON FeatureCollection instead of a table
        #[arg(long)]
        geojson: bool,
    },

    /// List the entries of the location filter dropdown
    Locations,

    /// Print the popup HTML for a location
    Popup {
        /// Location as shown in the dropdown (e.g. "Los Angeles, CA")
        location: String,
    },

    /// Show the cluster badge a group of airports would get
    Cluster {
        /// Airport codes of the members (e.g. JFK LGA EWR)
        #[arg(required = true)]
        codes: Vec<String>,
    },
}
