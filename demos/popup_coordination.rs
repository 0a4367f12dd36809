//! Popup coordination example for congestion-map
//!
//! Drives an [`AirCongestionMap`] with a console host that prints every
//! command it receives. Timers are simulated with a queue, so the run shows:
//! - hover and click handling with a single open popup
//! - picking a location whose marker is still clustered
//! - the bounded readiness poll after the view animation ends

use congestion_map::prelude::*;
use congestion_map::PollTicket;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

#[derive(Default)]
struct ConsoleHost {
    rendered: HashSet<MarkerId>,
    timers: VecDeque<PollTicket>,
    moved: bool,
    revealing: Option<MarkerId>,
}

impl MapHost for ConsoleHost {
    fn set_view(&mut self, view: MapView) {
        println!("  host: set_view {:?} zoom {}", view.center, view.zoom);
    }

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8) {
        println!("  host: fit_bounds {bounds:?} max zoom {max_zoom}");
        self.moved = true;
    }

    fn zoom_in(&mut self) {
        println!("  host: zoom in");
    }

    fn zoom_out(&mut self) {
        println!("  host: zoom out");
    }

    fn clear_markers(&mut self) {
        println!("  host: clear markers");
    }

    fn add_marker(&mut self, _marker: &Marker) {}

    fn open_popup(&mut self, marker: MarkerId) {
        println!("  host: open popup on #{}", marker.0);
    }

    fn close_popup(&mut self) {
        println!("  host: close popup");
    }

    fn is_attached(&self, _marker: MarkerId) -> bool {
        false
    }

    fn is_rendered(&self, marker: MarkerId) -> bool {
        self.rendered.contains(&marker)
    }

    fn reveal(&mut self, marker: MarkerId) {
        println!("  host: reveal #{}", marker.0);
        self.revealing = Some(marker);
    }

    fn schedule_poll(&mut self, ticket: PollTicket, delay: Duration) {
        println!("  host: poll {:?} in {}ms", ticket, delay.as_millis());
        self.timers.push_back(ticket);
    }

    fn cancel_poll(&mut self, ticket: PollTicket) {
        self.timers.retain(|t| *t != ticket);
    }

    fn show_error(&mut self, message: &str, ttl: Duration) {
        println!("  host: banner '{message}' for {}s", ttl.as_secs());
    }
}

fn main() -> Result<()> {
    println!("=== Congestion Map Popup Coordination Example ===\n");

    let config = MapConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let dataset = Dataset::load(&config.dataset, &config.jitter, &mut rng)?;

    let mut map = AirCongestionMap::new(ConsoleHost::default(), config);
    map.load_dataset(dataset);
    println!("Loaded {} markers\n", map.markers().len());

    println!("--- Hover two markers ---");
    map.handle(MapEvent::MarkerHover(MarkerId(0)));
    map.handle(MapEvent::MarkerHover(MarkerId(1)));
    println!("open popup: {:?}\n", map.open_marker());

    println!("--- Pick a clustered location ---");
    let selection: FilterSelection = "Chicago, IL".parse()?;
    map.handle(MapEvent::FilterChanged(selection));
    println!("pending: {:?}", map.pending_location().map(ToString::to_string));

    if std::mem::take(&mut map.host_mut().moved) {
        map.handle(MapEvent::MoveEnd);
    }
    // The zoom/spiderfy animation ends before the first check is scheduled.
    if let Some(id) = map.host_mut().revealing.take() {
        map.handle(MapEvent::Revealed(id));
    }

    // The marker shows up after the third check.
    let target = map.markers().first_for_location(map.records(), &"Chicago, IL".parse()?).map(|m| m.id);
    let mut checks = 0;
    while let Some(ticket) = map.host_mut().timers.pop_front() {
        checks += 1;
        if checks == 3 {
            if let Some(id) = target {
                map.host_mut().rendered.insert(id);
            }
        }
        map.handle(MapEvent::PollTick(ticket));
    }
    println!("poll finished after {checks} checks, open popup: {:?}\n", map.open_marker());

    println!("--- Back to all locations ---");
    map.handle(MapEvent::FilterChanged(FilterSelection::All));

    println!("\n--- A failed reload keeps the markers ---");
    map.load_failed(&"HTTP error! status: 503");
    println!("still showing {} markers", map.markers().len());

    Ok(())
}
