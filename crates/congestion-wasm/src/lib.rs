//! congestion-wasm: WebAssembly bindings for congestion-core
//!
//! The browser keeps the actual map (Leaflet with the marker-cluster plugin).
//! This crate keeps the decisions: which color and radius every marker gets,
//! what a cluster badge looks like, which popup is open, and what to do when
//! a location is picked from the filter dropdown.
//!
//! The JS side hands in a host object implementing the methods declared on
//! [`JsMapHost`] and forwards widget events to the matching methods of
//! [`AirCongestionMap`].
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { AirCongestionMap } from 'congestion-wasm';
//!
//! await init();
//! const map = new AirCongestionMap(leafletHost, null);
//! try {
//!   const res = await fetch('data/us-air.json');
//!   if (!res.ok) throw new Error(`HTTP error! status: ${res.status}`);
//!   map.load_json(await res.text());
//! } catch (err) {
//!   map.load_failed(String(err));
//! }
//! leaflet.on('moveend', () => map.move_end());
//! select.addEventListener('change', (e) => map.select_location(e.target.value));
//! ```
//!
//! Notes
//! -----
//! - Host callbacks may fire events synchronously (closing a popup emits
//!   `popupclose`). Such nested calls are queued and handled right after the
//!   current one, in order.
//! - Marker ids are indices into the current marker set. Every `load_json`
//!   invalidates the previous ids.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use wasm_bindgen::prelude::*;

use congestion_core::{
    AirCongestionMap as Coordinator, Bounds, Dataset, FilterSelection, MapConfig, MapEvent,
    MapHost, MapView, Marker, MarkerId, PollTicket,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_wasm_bindgen::to_value;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing congestion map WASM module...".into());
}

/* --------------------------------------------------------------------------
   Host interface (implemented in JS)
-------------------------------------------------------------------------- */

#[wasm_bindgen]
extern "C" {
    /// The JS object wrapping the Leaflet map and its cluster layer.
    pub type JsMapHost;

    #[wasm_bindgen(method, js_name = setView)]
    fn js_set_view(this: &JsMapHost, lat: f64, lng: f64, zoom: u8);

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn js_fit_bounds(this: &JsMapHost, south: f64, west: f64, north: f64, east: f64, max_zoom: u8);

    #[wasm_bindgen(method, js_name = zoomIn)]
    fn js_zoom_in(this: &JsMapHost);

    #[wasm_bindgen(method, js_name = zoomOut)]
    fn js_zoom_out(this: &JsMapHost);

    #[wasm_bindgen(method, js_name = clearMarkers)]
    fn js_clear_markers(this: &JsMapHost);

    /// Receives the serialized marker (id, position, style, popup_html, ...).
    #[wasm_bindgen(method, js_name = addMarker)]
    fn js_add_marker(this: &JsMapHost, marker: JsValue);

    #[wasm_bindgen(method, js_name = openPopup)]
    fn js_open_popup(this: &JsMapHost, id: u32);

    #[wasm_bindgen(method, js_name = closePopup)]
    fn js_close_popup(this: &JsMapHost);

    #[wasm_bindgen(method, js_name = isAttached)]
    fn js_is_attached(this: &JsMapHost, id: u32) -> bool;

    #[wasm_bindgen(method, js_name = isRendered)]
    fn js_is_rendered(this: &JsMapHost, id: u32) -> bool;

    #[wasm_bindgen(method, js_name = reveal)]
    fn js_reveal(this: &JsMapHost, id: u32);

    #[wasm_bindgen(method, js_name = schedulePoll)]
    fn js_schedule_poll(this: &JsMapHost, ticket: f64, delay_ms: f64);

    #[wasm_bindgen(method, js_name = cancelPoll)]
    fn js_cancel_poll(this: &JsMapHost, ticket: f64);

    #[wasm_bindgen(method, js_name = showError)]
    fn js_show_error(this: &JsMapHost, message: &str, ttl_ms: f64);
}

fn js_id(id: MarkerId) -> u32 {
    id.0 as u32
}

fn js_ms(d: Duration) -> f64 {
    d.as_millis() as f64
}

impl MapHost for JsMapHost {
    fn set_view(&mut self, view: MapView) {
        self.js_set_view(view.center.lat, view.center.lng, view.zoom);
    }

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8) {
        let (sw, ne) = (bounds.south_west, bounds.north_east);
        self.js_fit_bounds(sw.lat, sw.lng, ne.lat, ne.lng, max_zoom);
    }

    fn zoom_in(&mut self) {
        self.js_zoom_in();
    }

    fn zoom_out(&mut self) {
        self.js_zoom_out();
    }

    fn clear_markers(&mut self) {
        self.js_clear_markers();
    }

    fn add_marker(&mut self, marker: &Marker) {
        match to_value(marker) {
            Ok(value) => self.js_add_marker(value),
            Err(e) => web_sys::console::error_1(
                &format!("Skipping marker {}: {e}", marker.identifier).into(),
            ),
        }
    }

    fn open_popup(&mut self, marker: MarkerId) {
        self.js_open_popup(js_id(marker));
    }

    fn close_popup(&mut self) {
        self.js_close_popup();
    }

    fn is_attached(&self, marker: MarkerId) -> bool {
        self.js_is_attached(js_id(marker))
    }

    fn is_rendered(&self, marker: MarkerId) -> bool {
        self.js_is_rendered(js_id(marker))
    }

    fn reveal(&mut self, marker: MarkerId) {
        self.js_reveal(js_id(marker));
    }

    fn schedule_poll(&mut self, ticket: PollTicket, delay: Duration) {
        self.js_schedule_poll(ticket.0 as f64, js_ms(delay));
    }

    fn cancel_poll(&mut self, ticket: PollTicket) {
        self.js_cancel_poll(ticket.0 as f64);
    }

    fn show_error(&mut self, message: &str, ttl: Duration) {
        self.js_show_error(message, js_ms(ttl));
    }
}

/* --------------------------------------------------------------------------
   Exported map
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub struct AirCongestionMap {
    inner: RefCell<Coordinator<JsMapHost>>,
    queue: RefCell<VecDeque<MapEvent>>,
    rng: RefCell<StdRng>,
}

#[wasm_bindgen]
impl AirCongestionMap {
    /// Creates the map and moves the host to the default view.
    /// `config_json` may override any subset of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsMapHost, config_json: Option<String>) -> Result<AirCongestionMap, JsError> {
        let config = match config_json.as_deref() {
            Some(text) if !text.trim().is_empty() => MapConfig::from_json_str(text)?,
            _ => MapConfig::default(),
        };
        Ok(Self {
            inner: RefCell::new(Coordinator::new(host, config)),
            queue: RefCell::new(VecDeque::new()),
            rng: RefCell::new(StdRng::from_entropy()),
        })
    }

    /// Replaces all data from the raw `us-air.json` text and re-renders.
    /// Returns the number of markers. On error nothing changes.
    pub fn load_json(&self, text: &str) -> Result<usize, JsError> {
        let mut map = self
            .inner
            .try_borrow_mut()
            .map_err(|_| JsError::new("load_json called from inside a map callback"))?;
        let dataset = {
            let mut rng = self.rng.borrow_mut();
            Dataset::from_json_str(text, &map.config().jitter, &mut *rng)?
        };
        map.load_dataset(dataset);
        self.drain(&mut map);
        Ok(map.markers().len())
    }

    /// Reports a failed fetch; shows the error banner and keeps the markers.
    pub fn load_failed(&self, reason: &str) {
        match self.inner.try_borrow_mut() {
            Ok(mut map) => {
                map.load_failed(&reason);
                self.drain(&mut map);
            }
            Err(_) => web_sys::console::error_1(&format!("Failed to load air data: {reason}").into()),
        }
    }

    /// The effective configuration (cluster options, bounds, zoom range...).
    pub fn config(&self) -> Result<JsValue, JsError> {
        let map = self.inner.try_borrow().map_err(|_| JsError::new("map is busy"))?;
        Ok(to_value(map.config())?)
    }

    pub fn marker_count(&self) -> usize {
        self.inner.try_borrow().map(|m| m.markers().len()).unwrap_or(0)
    }

    /// Style for one marker, or `undefined` for an unknown id.
    pub fn marker_style(&self, id: u32) -> Result<JsValue, JsError> {
        let map = self.inner.try_borrow().map_err(|_| JsError::new("map is busy"))?;
        match map.marker_style(MarkerId(id as usize)) {
            Some(style) => Ok(to_value(style)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Badge for a cluster, given its member marker ids in the plugin's order.
    pub fn cluster_badge(&self, ids: Vec<u32>) -> Result<JsValue, JsError> {
        let map = self.inner.try_borrow().map_err(|_| JsError::new("map is busy"))?;
        let members: Vec<MarkerId> = ids.into_iter().map(|id| MarkerId(id as usize)).collect();
        Ok(to_value(&map.cluster_badge(&members))?)
    }

    /// Dropdown entries ("City, ST"), sorted.
    pub fn location_options(&self) -> js_sys::Array {
        let array = js_sys::Array::new();
        if let Ok(map) = self.inner.try_borrow() {
            for key in map.filter().options() {
                array.push(&JsValue::from_str(&key.to_string()));
            }
        }
        array
    }

    pub fn marker_hover(&self, id: u32) {
        self.dispatch(MapEvent::MarkerHover(MarkerId(id as usize)));
    }

    pub fn marker_out(&self, id: u32) {
        self.dispatch(MapEvent::MarkerOut(MarkerId(id as usize)));
    }

    pub fn marker_click(&self, id: u32) {
        self.dispatch(MapEvent::MarkerClick(MarkerId(id as usize)));
    }

    /// Click on the map background.
    pub fn map_click(&self) {
        self.dispatch(MapEvent::BackgroundClick);
    }

    pub fn move_end(&self) {
        self.dispatch(MapEvent::MoveEnd);
    }

    /// The cluster plugin finished `zoomToShowLayer` for `id`.
    pub fn revealed(&self, id: u32) {
        self.dispatch(MapEvent::Revealed(MarkerId(id as usize)));
    }

    pub fn poll_tick(&self, ticket: f64) {
        self.dispatch(MapEvent::PollTick(PollTicket(ticket as u64)));
    }

    pub fn popup_opened(&self, id: u32) {
        self.dispatch(MapEvent::PopupOpened(MarkerId(id as usize)));
    }

    pub fn popup_closed(&self, id: u32) {
        self.dispatch(MapEvent::PopupClosed(MarkerId(id as usize)));
    }

    /// Dropdown change: `""` (placeholder), `"All"` or `"City, ST"`.
    pub fn select_location(&self, value: &str) -> Result<(), JsError> {
        let selection: FilterSelection = value.parse()?;
        self.dispatch(MapEvent::FilterChanged(selection));
        Ok(())
    }

    pub fn reset_view(&self) {
        self.dispatch(MapEvent::ResetView);
    }

    pub fn zoom_in(&self) {
        self.dispatch(MapEvent::ZoomIn);
    }

    pub fn zoom_out(&self) {
        self.dispatch(MapEvent::ZoomOut);
    }
}

impl AirCongestionMap {
    /// Queues `event` and, unless we are already inside a handler further up
    /// the stack, drains the queue.
    fn dispatch(&self, event: MapEvent) {
        self.queue.borrow_mut().push_back(event);
        let Ok(mut map) = self.inner.try_borrow_mut() else {
            return;
        };
        self.drain(&mut map);
    }

    /// Handles everything host callbacks queued while `map` was borrowed.
    fn drain(&self, map: &mut Coordinator<JsMapHost>) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(event) => map.handle(event),
                None => break,
            }
        }
    }
}
