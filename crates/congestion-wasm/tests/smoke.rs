#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

use congestion_wasm::{AirCongestionMap, JsMapHost};

const DATA: &str = r#"[
  {"latitude_deg": 40.64, "longitude_deg": -73.78, "airport_code": "JFK",
   "municipality": "New York", "iso_region": "US-NY", "average_txo": 18.5},
  {"latitude_deg": 40.77, "longitude_deg": -73.87, "airport_code": "LGA",
   "municipality": "New York", "iso_region": "US-NY", "average_txo": 26}
]"#;

/// A host that records method names and reports every marker as ready.
fn recording_host() -> (JsMapHost, js_sys::Array) {
    let host = js_sys::eval(
        r#"(() => {
            const calls = [];
            const host = { calls };
            // `on<Name>`, when set, runs synchronously inside the call.
            const log = (name) => (...args) => {
                calls.push(name);
                const hook = host["on" + name[0].toUpperCase() + name.slice(1)];
                if (hook) hook();
            };
            return Object.assign(host, {
                setView: log("setView"), fitBounds: log("fitBounds"),
                zoomIn: log("zoomIn"), zoomOut: log("zoomOut"),
                clearMarkers: log("clearMarkers"), addMarker: log("addMarker"),
                openPopup: log("openPopup"), closePopup: log("closePopup"),
                isAttached: () => true, isRendered: () => true,
                reveal: log("reveal"), schedulePoll: log("schedulePoll"),
                cancelPoll: log("cancelPoll"), showError: log("showError"),
            });
        })()"#,
    )
    .expect("host object");
    let calls = js_sys::Reflect::get(&host, &JsValue::from_str("calls"))
        .expect("calls array")
        .unchecked_into::<js_sys::Array>();
    (host.unchecked_into::<JsMapHost>(), calls)
}

fn new_map(host: JsMapHost) -> AirCongestionMap {
    match AirCongestionMap::new(host, None) {
        Ok(map) => map,
        Err(_) => panic!("default config must be accepted"),
    }
}

#[wasm_bindgen_test]
fn loads_markers_and_lists_locations() {
    let (host, calls) = recording_host();
    let map = new_map(host);

    assert_eq!(map.load_json(DATA).ok(), Some(2));
    assert_eq!(map.location_options().length(), 1);
    assert!(calls.includes(&JsValue::from_str("addMarker"), 0));
}

#[wasm_bindgen_test]
fn bad_payload_is_rejected() {
    let (host, _) = recording_host();
    let map = new_map(host);
    assert!(map.load_json("not json").is_err());
    assert_eq!(map.marker_count(), 0);
}

#[wasm_bindgen_test]
fn selecting_attached_location_reveals_marker() {
    let (host, calls) = recording_host();
    let map = new_map(host);
    assert!(map.load_json(DATA).is_ok());

    assert!(map.select_location("New York, NY").is_ok());

    assert!(calls.includes(&JsValue::from_str("reveal"), 0));
    assert!(map.select_location("nowhere").is_err());
}

/// Makes the host call `marker_hover(0)` from inside `hook_name`, the way a
/// Leaflet event would fire during a layer operation.
fn hover_from_hook(host: &JsValue, map: &Rc<AirCongestionMap>, hook_name: &str) {
    let map = Rc::clone(map);
    let hook = Closure::<dyn FnMut()>::new(move || map.marker_hover(0));
    assert!(js_sys::Reflect::set(host, &JsValue::from_str(hook_name), hook.as_ref()).is_ok());
    hook.forget();
}

#[wasm_bindgen_test]
fn events_fired_during_load_are_handled_before_it_returns() {
    let (host, calls) = recording_host();
    let handle = AsRef::<JsValue>::as_ref(&host).clone();
    let map = Rc::new(new_map(host));
    hover_from_hook(&handle, &map, "onClearMarkers");

    assert_eq!(map.load_json(DATA).ok(), Some(2));

    assert!(calls.includes(&JsValue::from_str("openPopup"), 0));
}

#[wasm_bindgen_test]
fn events_fired_during_load_failure_are_handled_before_it_returns() {
    let (host, calls) = recording_host();
    let handle = AsRef::<JsValue>::as_ref(&host).clone();
    let map = Rc::new(new_map(host));
    assert!(map.load_json(DATA).is_ok());
    hover_from_hook(&handle, &map, "onShowError");

    map.load_failed("HTTP error! status: 503");

    assert!(calls.includes(&JsValue::from_str("openPopup"), 0));
}
