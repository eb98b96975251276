//! Browser-side implementations of the map renderer, address bar and clipboard.

use crate::js_bridge;
use dioxus::prelude::*;
use geodash_core::geometry::{Bounds, LatLng};
use geodash_core::layers::{BaseLayer, LayerSource};
use geodash_state::map_surface::{MapNotice, MapRenderer};
use geodash_state::backend::Clipboard;
use geodash_state::view_sync::AddressBar;
use serde_json::json;
use wasm_bindgen::JsValue;

/// Drives the Leaflet map through the JS bridge.
#[derive(Clone, Copy)]
pub struct LeafletRenderer {
    notice: Signal<Option<String>>,
}

impl LeafletRenderer {
    /// Notices from the map are written to `notice`.
    pub fn new(notice: Signal<Option<String>>) -> Self {
        Self { notice }
    }
}

fn bounds_args(bounds: &Bounds) -> [f64; 4] {
    let sw = bounds.south_west();
    let ne = bounds.north_east();
    [sw.lat, sw.lng, ne.lat, ne.lng]
}

impl MapRenderer for LeafletRenderer {
    fn show_base_layer(&self, layer: BaseLayer, source: &LayerSource) {
        js_bridge::map_call("showBaseLayer", json!([layer.name(), source]));
    }

    fn hide_base_layer(&self, layer: BaseLayer) {
        js_bridge::map_call("hideBaseLayer", json!([layer.name()]));
    }

    fn clear_drawn(&self) {
        js_bridge::map_call("clearDrawn", json!([]));
    }

    fn draw_polygon(&self, vertices: &[LatLng]) {
        let ring: Vec<[f64; 2]> = vertices.iter().map(|p| [p.lat, p.lng]).collect();
        js_bridge::map_call("drawPolygon", json!([ring]));
    }

    fn fit_bounds(&self, bounds: &Bounds) {
        let [south, west, north, east] = bounds_args(bounds);
        js_bridge::map_call("fitBounds", json!([south, west, north, east]));
    }

    fn show_overlay(&self, url: &str, bounds: &Bounds, opacity: f64) {
        let [south, west, north, east] = bounds_args(bounds);
        js_bridge::map_call(
            "showOverlay",
            json!([url, south, west, north, east, opacity]),
        );
    }

    fn remove_overlay(&self) {
        js_bridge::map_call("removeOverlay", json!([]));
    }

    fn set_overlay_opacity(&self, opacity: f64) {
        js_bridge::map_call("setOverlayOpacity", json!([opacity]));
    }

    fn notify(&self, notice: &MapNotice) {
        let mut signal = self.notice;
        signal.set(Some(notice.to_string()));
    }
}

/// `window.location.search`, rewritten with `history.replaceState`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserAddressBar;

impl AddressBar for BrowserAddressBar {
    fn query(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default()
    }

    fn replace_query(&self, query: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.history() {
            Ok(history) => {
                if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(query)) {
                    log::warn!("replaceState failed: {:?}", err);
                }
            }
            Err(err) => log::warn!("No history object: {:?}", err),
        }
    }

    fn href(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().href().ok())
            .unwrap_or_default()
    }
}

/// `navigator.clipboard`, or `execCommand('copy')` where that is missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        js_bridge::copy_to_clipboard(text)
            .await
            .map_err(|err| err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }
}
