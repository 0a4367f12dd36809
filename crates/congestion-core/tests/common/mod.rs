#![allow(dead_code)]

use congestion_core::{
    AirCongestionMap, Bounds, Dataset, LocationRecord, MapConfig, MapEvent, MapHost, MapView,
    Marker, MarkerId, PollTicket,
};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetView(MapView),
    FitBounds(Bounds, u8),
    ZoomIn,
    ZoomOut,
    ClearMarkers,
    AddMarker(MarkerId),
    OpenPopup(MarkerId),
    ClosePopup,
    Reveal(MarkerId),
    SchedulePoll(PollTicket, Duration),
    CancelPoll(PollTicket),
    ShowError(String, Duration),
}

/// Records every call; marker readiness is set by the test.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub calls: Vec<Call>,
    pub attached: HashSet<MarkerId>,
    pub rendered: HashSet<MarkerId>,
    pub scheduled: VecDeque<PollTicket>,
    pub layer: Vec<MarkerId>,
}

impl FakeHost {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn opened(&self) -> Vec<MarkerId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::OpenPopup(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl MapHost for FakeHost {
    fn set_view(&mut self, view: MapView) {
        self.calls.push(Call::SetView(view));
    }

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8) {
        self.calls.push(Call::FitBounds(bounds, max_zoom));
    }

    fn zoom_in(&mut self) {
        self.calls.push(Call::ZoomIn);
    }

    fn zoom_out(&mut self) {
        self.calls.push(Call::ZoomOut);
    }

    fn clear_markers(&mut self) {
        self.layer.clear();
        self.calls.push(Call::ClearMarkers);
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.layer.push(marker.id);
        self.calls.push(Call::AddMarker(marker.id));
    }

    fn open_popup(&mut self, marker: MarkerId) {
        self.calls.push(Call::OpenPopup(marker));
    }

    fn close_popup(&mut self) {
        self.calls.push(Call::ClosePopup);
    }

    fn is_attached(&self, marker: MarkerId) -> bool {
        self.attached.contains(&marker)
    }

    fn is_rendered(&self, marker: MarkerId) -> bool {
        self.rendered.contains(&marker)
    }

    fn reveal(&mut self, marker: MarkerId) {
        self.calls.push(Call::Reveal(marker));
    }

    fn schedule_poll(&mut self, ticket: PollTicket, delay: Duration) {
        self.scheduled.push_back(ticket);
        self.calls.push(Call::SchedulePoll(ticket, delay));
    }

    fn cancel_poll(&mut self, ticket: PollTicket) {
        self.scheduled.retain(|t| *t != ticket);
        self.calls.push(Call::CancelPoll(ticket));
    }

    fn show_error(&mut self, message: &str, ttl: Duration) {
        self.calls.push(Call::ShowError(message.to_string(), ttl));
    }
}

pub fn record(
    code: &str,
    lat: f64,
    lng: f64,
    city: &str,
    region: &str,
    txo: Option<f64>,
) -> LocationRecord {
    LocationRecord {
        latitude: lat,
        longitude: lng,
        identifier: code.to_string(),
        name: Some(format!("{code} International")),
        municipality: Some(city.to_string()),
        region: Some(region.to_string()),
        severity_metric: txo,
        scheduled_count: Some(120.0),
        departed_count: Some(110.0),
        completion_factor: Some(91.7),
        last_updated: None,
    }
}

pub fn sample_records() -> Vec<LocationRecord> {
    vec![
        record("LAX", 33.94, -118.41, "Los Angeles", "US-CA", Some(27.0)),
        record("JFK", 40.64, -73.78, "New York", "US-NY", Some(18.5)),
        record("LGA", 40.77, -73.87, "New York", "US-NY", Some(22.0)),
        record("ORD", 41.97, -87.91, "Chicago", "US-IL", None),
    ]
}

pub fn loaded_map(config: MapConfig) -> AirCongestionMap<FakeHost> {
    let mut map = AirCongestionMap::new(FakeHost::default(), config);
    map.load_dataset(Dataset {
        records: sample_records(),
        ..Dataset::default()
    });
    map.host_mut().calls.clear();
    map
}

/// Delivers queued poll ticks until none remain; returns how many were delivered.
/// `ready_after` marks `target` rendered once that many ticks went by.
pub fn drain_ticks(
    map: &mut AirCongestionMap<FakeHost>,
    target: MarkerId,
    ready_after: Option<usize>,
) -> usize {
    let mut delivered = 0;
    while let Some(ticket) = map.host_mut().scheduled.pop_front() {
        if ready_after == Some(delivered) {
            map.host_mut().rendered.insert(target);
        }
        map.handle(MapEvent::PollTick(ticket));
        delivered += 1;
        assert!(delivered < 10_000, "poll never terminated");
    }
    delivered
}
