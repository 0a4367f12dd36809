// crates/congestion-core/src/coordinator.rs

//! # Popup / selection coordinator
//!
//! [`AirCongestionMap`] owns the loaded records, the current [`MarkerSet`],
//! the filter control and the popup state, and drives an external map widget
//! through the [`MapHost`] trait.
//!
//! State is deliberately small:
//!
//! - `open`: the one marker whose popup is open, if any.
//! - `pending`: a location selected from the filter whose marker did not
//!   exist yet. It survives until the host reports the end of the view
//!   animation ([`MapEvent::MoveEnd`]).
//! - `poll`: the single live readiness poll started from `pending`. It is
//!   identified by a [`PollTicket`] and waits for [`MapEvent::Revealed`]
//!   before its first check is scheduled. Cancelling drops the task, so a
//!   tick the host had already queued no longer matches and is ignored.
//! - `reveal`: a marker to open once the host finishes revealing it.
//!
//! All mutation happens in `&mut self` handlers, one event at a time.

use std::time::Duration;

use crate::cluster::{cluster_badge, ClusterBadge};
use crate::config::MapConfig;
use crate::filter::{FilterControl, FilterSelection, LocationKey};
use crate::loader::Dataset;
use crate::marker::{Marker, MarkerId, MarkerSet, MarkerStyle};
use crate::model::{Bounds, LocationRecord, MapView};

/// The map widget as seen by the coordinator.
///
/// Implementations wrap the real rendering library (Leaflet plus a
/// marker-cluster plugin in the browser) or a recording fake in tests.
/// Methods that start an animation return immediately; completion comes
/// back as a [`MapEvent`].
pub trait MapHost {
    /// Jump or animate to a view. A [`MapEvent::MoveEnd`] follows.
    fn set_view(&mut self, view: MapView);

    /// Fit the view around `bounds`, never zooming past `max_zoom`.
    /// A [`MapEvent::MoveEnd`] follows.
    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8);

    fn zoom_in(&mut self);
    fn zoom_out(&mut self);

    /// Drop every marker from the cluster layer.
    fn clear_markers(&mut self);

    /// Add one styled marker (with its popup content) to the cluster layer.
    fn add_marker(&mut self, marker: &Marker);

    fn open_popup(&mut self, marker: MarkerId);

    /// Close whatever popup is open. Safe to call with none open.
    fn close_popup(&mut self);

    /// A live marker object for `marker` is attached to the map.
    fn is_attached(&self, marker: MarkerId) -> bool;

    /// The marker's element exists on screen (not folded into a cluster,
    /// not waiting to be created).
    fn is_rendered(&self, marker: MarkerId) -> bool;

    /// Zoom/pan/spiderfy until `marker` is visible.
    /// A [`MapEvent::Revealed`] follows.
    fn reveal(&mut self, marker: MarkerId);

    /// Deliver [`MapEvent::PollTick`] with `ticket` after `delay`.
    fn schedule_poll(&mut self, ticket: PollTicket, delay: Duration);

    /// Drop a scheduled tick. Ticks that slip through are ignored anyway.
    fn cancel_poll(&mut self, ticket: PollTicket);

    /// Transient banner, removed by the host after `ttl`.
    fn show_error(&mut self, message: &str, ttl: Duration);
}

/// Handle of one deferred poll sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PollTicket(pub u64);

/// Everything the host reports back, plus the controls' user actions.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    MarkerHover(MarkerId),
    MarkerOut(MarkerId),
    MarkerClick(MarkerId),
    /// Click on the map itself, outside any marker or popup.
    BackgroundClick,
    /// A pan/zoom animation finished.
    MoveEnd,
    Revealed(MarkerId),
    PollTick(PollTicket),
    PopupOpened(MarkerId),
    PopupClosed(MarkerId),
    FilterChanged(FilterSelection),
    /// The reset button.
    ResetView,
    ZoomIn,
    ZoomOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PollTask {
    ticket: PollTicket,
    target: MarkerId,
    location: LocationKey,
    /// False until the host reports the target revealed; no tick is
    /// scheduled before that.
    scheduled: bool,
    checks: u32,
}

pub struct AirCongestionMap<H: MapHost> {
    host: H,
    config: MapConfig,
    records: Vec<LocationRecord>,
    markers: MarkerSet,
    filter: FilterControl,
    open: Option<MarkerId>,
    pending: Option<LocationKey>,
    reveal: Option<MarkerId>,
    poll: Option<PollTask>,
    next_ticket: u64,
}

impl<H: MapHost> AirCongestionMap<H> {
    /// A map with no data, framed at the default view.
    pub fn new(mut host: H, config: MapConfig) -> Self {
        host.set_view(config.default_view);
        Self {
            host,
            config,
            records: Vec::new(),
            markers: MarkerSet::default(),
            filter: FilterControl::default(),
            open: None,
            pending: None,
            reveal: None,
            poll: None,
            next_ticket: 0,
        }
    }

    // -----------------------------------------------------------------------
    // DATA
    // -----------------------------------------------------------------------

    /// Replaces all data, rebuilds every marker and the filter options.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        self.records = dataset.records;
        self.filter = FilterControl::from_records(&self.records);
        self.render();
    }

    /// Reports a failed load: logs it and shows the banner. Records, markers
    /// and selection from any earlier load stay as they are.
    pub fn load_failed(&mut self, error: &dyn std::fmt::Display) {
        tracing::error!(%error, "failed to load air data");
        self.host
            .show_error(&self.config.load_error_message, self.config.error_banner_ttl());
    }

    /// Full clear-and-rebuild of the marker layer.
    ///
    /// Marker ids from the previous pass are invalid afterwards, so every
    /// piece of selection state that refers to them is dropped too.
    pub fn render(&mut self) {
        self.cancel_poll();
        self.pending = None;
        self.reveal = None;
        if self.open.take().is_some() {
            self.host.close_popup();
        }

        self.host.clear_markers();
        self.markers = MarkerSet::build(&self.records, &self.config.tiers);
        if self.markers.is_empty() {
            tracing::warn!("no data to render, marker layer cleared");
            return;
        }
        for marker in self.markers.iter() {
            self.host.add_marker(marker);
        }
        tracing::debug!(markers = self.markers.len(), "markers rendered");
    }

    // -----------------------------------------------------------------------
    // EVENTS
    // -----------------------------------------------------------------------

    pub fn handle(&mut self, event: MapEvent) {
        match event {
            MapEvent::MarkerHover(id) => {
                self.close_popup();
                self.open_popup(id);
            }
            MapEvent::MarkerOut(id) => {
                if self.open == Some(id) {
                    self.close_popup();
                }
            }
            MapEvent::MarkerClick(id) => self.marker_clicked(id),
            MapEvent::BackgroundClick => {
                tracing::debug!("map background clicked, closing popups");
                self.close_popup();
                self.clear_pending();
            }
            MapEvent::MoveEnd => {
                if let Some(location) = self.pending.take() {
                    tracing::debug!(%location, "view settled, polling for queued popup");
                    self.start_poll(location);
                }
            }
            MapEvent::Revealed(id) => {
                if self.poll.as_ref().is_some_and(|t| t.target == id && !t.scheduled) {
                    self.schedule_first_check();
                } else if self.reveal == Some(id) {
                    self.reveal = None;
                    self.open_popup(id);
                }
            }
            MapEvent::PollTick(ticket) => self.poll_tick(ticket),
            MapEvent::PopupOpened(id) => {
                self.open = Some(id);
            }
            MapEvent::PopupClosed(id) => {
                // Our own closes clear `open` first; a match here means the
                // user closed it.
                if self.open == Some(id) {
                    self.open = None;
                    self.clear_pending();
                }
            }
            MapEvent::FilterChanged(selection) => self.select(selection),
            MapEvent::ResetView => {
                tracing::debug!("reset button clicked");
                self.show_default_view();
                self.filter.clear();
            }
            MapEvent::ZoomIn => self.host.zoom_in(),
            MapEvent::ZoomOut => self.host.zoom_out(),
        }
    }

    /// Applies a filter dropdown change.
    pub fn select(&mut self, selection: FilterSelection) {
        self.filter.select(selection.clone());
        match selection {
            FilterSelection::Placeholder => {}
            FilterSelection::All => {
                tracing::debug!("all locations selected, resetting view");
                self.show_default_view();
            }
            FilterSelection::Location(key) => self.select_location(key),
        }
    }

    fn select_location(&mut self, key: LocationKey) {
        let matching = self.records.iter().filter(|r| r.matches(&key));
        let Some(bounds) = Bounds::from_points(matching.map(LocationRecord::position)) else {
            tracing::warn!(location = %key, "no data found for location");
            return;
        };

        // A newer selection supersedes whatever was queued before.
        self.clear_pending();

        let target = self
            .markers
            .first_for_location(&self.records, &key)
            .map(|m| m.id);

        match target {
            Some(id) if self.host.is_attached(id) => {
                tracing::debug!(location = %key, "marker attached, revealing");
                self.close_popup();
                self.reveal = Some(id);
                self.host.reveal(id);
            }
            _ => {
                tracing::debug!(location = %key, "marker not attached, fitting bounds and queueing popup");
                let padded = bounds.pad(self.config.fit_padding);
                self.host.fit_bounds(padded, self.config.location_max_zoom());
                self.pending = Some(key);
            }
        }
    }

    fn marker_clicked(&mut self, id: MarkerId) {
        self.close_popup();
        if self.host.is_rendered(id) {
            self.open_popup(id);
        } else {
            self.reveal = Some(id);
            self.host.reveal(id);
        }
    }

    fn show_default_view(&mut self) {
        self.host.set_view(self.config.default_view);
        self.close_popup();
        self.clear_pending();
    }

    // -----------------------------------------------------------------------
    // DEFERRED POLL
    // -----------------------------------------------------------------------

    fn start_poll(&mut self, location: LocationKey) {
        let Some(target) = self
            .markers
            .first_for_location(&self.records, &location)
            .map(|m| m.id)
        else {
            tracing::warn!(%location, "marker for location not found in current layers");
            return;
        };

        self.close_popup();
        self.cancel_poll();

        let ticket = PollTicket(self.next_ticket);
        self.next_ticket += 1;
        self.poll = Some(PollTask {
            ticket,
            target,
            location,
            scheduled: false,
            checks: 0,
        });
        self.host.reveal(target);
    }

    fn schedule_first_check(&mut self) {
        let Some(task) = self.poll.as_mut() else {
            return;
        };
        task.scheduled = true;
        tracing::debug!(location = %task.location, "target revealed, starting poll");
        self.host.schedule_poll(task.ticket, self.config.poll.initial_delay());
    }

    fn poll_tick(&mut self, ticket: PollTicket) {
        let Some(task) = self.poll.as_mut().filter(|t| t.ticket == ticket) else {
            tracing::debug!(?ticket, "ignoring stale poll tick");
            return;
        };
        task.checks += 1;
        let (target, checks) = (task.target, task.checks);

        if self.host.is_rendered(target) {
            if let Some(task) = self.poll.take() {
                tracing::info!(location = %task.location, check = checks, "poll success, opening popup");
            }
            self.open_popup(target);
        } else if checks < self.config.poll.max_checks {
            tracing::debug!(check = checks, "marker not ready, retrying");
            self.host.schedule_poll(ticket, self.config.poll.interval());
        } else if let Some(task) = self.poll.take() {
            tracing::error!(
                location = %task.location,
                checks,
                "failed to open popup after max polling checks"
            );
        }
    }

    fn cancel_poll(&mut self) {
        if let Some(task) = self.poll.take() {
            tracing::debug!(location = %task.location, "cancelling poll");
            if task.scheduled {
                self.host.cancel_poll(task.ticket);
            }
        }
    }

    fn clear_pending(&mut self) {
        self.pending = None;
        self.reveal = None;
        self.cancel_poll();
    }

    // -----------------------------------------------------------------------
    // POPUPS
    // -----------------------------------------------------------------------

    fn open_popup(&mut self, id: MarkerId) {
        let Some(marker) = self.markers.get(id) else {
            tracing::warn!(?id, "popup requested for unknown marker");
            return;
        };
        tracing::info!(airport = %marker.identifier, "popup opened");
        self.open = Some(id);
        self.host.open_popup(id);
    }

    fn close_popup(&mut self) {
        self.open = None;
        self.host.close_popup();
    }

    // -----------------------------------------------------------------------
    // ACCESSORS / CALLBACKS
    // -----------------------------------------------------------------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn filter(&self) -> &FilterControl {
        &self.filter
    }

    pub fn open_marker(&self) -> Option<MarkerId> {
        self.open
    }

    pub fn pending_location(&self) -> Option<&LocationKey> {
        self.pending.as_ref()
    }

    /// Ticket of the live poll, if one is running.
    pub fn active_poll(&self) -> Option<PollTicket> {
        self.poll.as_ref().map(|t| t.ticket)
    }

    /// Style callback for the host's marker layer.
    pub fn marker_style(&self, id: MarkerId) -> Option<&MarkerStyle> {
        self.markers.get(id).map(|m| &m.style)
    }

    /// Cluster-icon callback: `members` as enumerated by the clustering layer.
    pub fn cluster_badge(&self, members: &[MarkerId]) -> ClusterBadge {
        let metrics = members
            .iter()
            .map(|id| self.markers.get(*id).and_then(|m| m.severity_metric));
        cluster_badge(metrics, &self.config.tiers, &self.config.cluster)
    }
}
