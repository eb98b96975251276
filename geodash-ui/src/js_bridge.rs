//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! Leaflet (with leaflet-draw) renders the map and D3.js renders the
//! statistics chart. Their wrapper scripts live in `assets/js/*.js`, are
//! embedded at compile time and evaluated as globals once the libraries
//! have loaded. Map calls are queued in order and replayed when the map
//! exists, so callers never have to wait for it.

use geodash_core::geometry::LatLng;
use js_sys::{Array, Function, Promise, Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

static MAP_JS: &str = include_str!("../assets/js/map.js");
static SERIES_CHART_JS: &str = include_str!("../assets/js/series-chart.js");

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_DRAW_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.draw/1.0.4/leaflet.draw.css";
const LEAFLET_DRAW_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.draw/1.0.4/leaflet.draw.js";
const D3_JS: &str = "https://d3js.org/d3.v7.min.js";

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('GeoDash JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Quote a Rust string as a JS string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}

/// Add the Leaflet, leaflet-draw and D3 tags to `<head>` unless present.
///
/// leaflet-draw needs `L`, so it is only appended once Leaflet has loaded.
pub fn load_libraries() {
    call_js(&format!(
        r#"
        (function() {{
            function css(href) {{
                if (document.querySelector('link[href="' + href + '"]')) return;
                var l = document.createElement('link');
                l.rel = 'stylesheet'; l.href = href;
                document.head.appendChild(l);
            }}
            function js(src, onload) {{
                var existing = document.querySelector('script[src="' + src + '"]');
                if (existing) {{ if (onload) onload(); return; }}
                var s = document.createElement('script');
                s.src = src;
                if (onload) s.onload = onload;
                document.head.appendChild(s);
            }}
            css({leaflet_css});
            css({draw_css});
            js({leaflet_js}, function() {{ js({draw_js}); }});
            js({d3_js});
        }})();
        "#,
        leaflet_css = js_string(LEAFLET_CSS),
        draw_css = js_string(LEAFLET_DRAW_CSS),
        leaflet_js = js_string(LEAFLET_JS),
        draw_js = js_string(LEAFLET_DRAW_JS),
        d3_js = js_string(D3_JS),
    ));
}

/// Create the map in `container_id` once Leaflet, leaflet-draw and the
/// container element are available, then run any queued map calls.
pub fn init_map(container_id: &str, center: LatLng, zoom: f64) {
    let all_js = [MAP_JS, SERIES_CHART_JS].join("\n");
    let store_js = format!(
        "window.__geodashScripts = window.__geodashScripts || {};",
        js_string(&all_js)
    );
    let _ = js_sys::eval(&store_js);

    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (typeof L !== 'undefined' &&
                    L.Control && L.Control.Draw &&
                    document.getElementById({id})) {{
                    clearInterval(poll);
                    if (window.__geodashScripts) {{
                        // Eval at global scope via indirect eval
                        (0, eval)(window.__geodashScripts);
                        delete window.__geodashScripts;
                        window.geodashInitMap = geodashInitMap;
                        window.geodashFlush = geodashFlush;
                        window.geodashDestroyMap = geodashDestroyMap;
                        window.renderSeriesChart = renderSeriesChart;
                    }}
                    try {{
                        window.geodashInitMap({id}, {lat}, {lng}, {zoom});
                        window.geodashFlush();
                        console.log('GeoDash map initialized');
                    }} catch(e) {{ console.error('[GeoDash] map init error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
        id = js_string(container_id),
        lat = center.lat,
        lng = center.lng,
        zoom = zoom,
    ));
}

/// Queue `name(args...)` for the map and flush if it is ready.
pub fn map_call(name: &str, args: Value) {
    call_js(&format!(
        "(window.__geodashPending = window.__geodashPending || []).push([{}, {}]); \
         if (window.geodashFlush) window.geodashFlush();",
        js_string(name),
        args
    ));
}

pub fn destroy_map() {
    call_js("if (window.geodashDestroyMap) window.geodashDestroyMap();");
}

/// JS callbacks for map events. Unregistered when dropped.
pub struct MapCallbacks {
    _on_polygon: Closure<dyn FnMut(String)>,
    _on_move: Closure<dyn FnMut(f64, f64, f64)>,
}

const ON_POLYGON: &str = "__geodashOnPolygon";
const ON_MOVE: &str = "__geodashOnMove";

/// Route finished polygons and pan/zoom events from the map into Rust.
pub fn register_map_callbacks(
    mut on_polygon: impl FnMut(Vec<LatLng>) + 'static,
    on_move: impl FnMut(f64, f64, f64) + 'static,
) -> MapCallbacks {
    let on_polygon = Closure::<dyn FnMut(String)>::new(move |json: String| {
        match serde_json::from_str::<Vec<[f64; 2]>>(&json) {
            Ok(points) => on_polygon(
                points
                    .into_iter()
                    .map(|[lat, lng]| LatLng::new(lat, lng))
                    .collect(),
            ),
            Err(err) => log::warn!("Ignoring malformed polygon from map: {}", err),
        }
    });
    let on_move = Closure::<dyn FnMut(f64, f64, f64)>::new(on_move);

    let global = js_sys::global();
    let _ = Reflect::set(&global, &JsValue::from_str(ON_POLYGON), on_polygon.as_ref());
    let _ = Reflect::set(&global, &JsValue::from_str(ON_MOVE), on_move.as_ref());

    MapCallbacks {
        _on_polygon: on_polygon,
        _on_move: on_move,
    }
}

impl Drop for MapCallbacks {
    fn drop(&mut self) {
        let global = js_sys::global();
        let _ = Reflect::delete_property(&global, &JsValue::from_str(ON_POLYGON));
        let _ = Reflect::delete_property(&global, &JsValue::from_str(ON_MOVE));
    }
}

/// Render the combined statistics chart.
///
/// Uses a polling loop to wait for D3.js to load, the chart script to
/// initialize, and the container DOM element to exist before rendering.
pub fn render_series_chart(container_id: &str, data_json: &str) {
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (typeof d3 !== 'undefined' &&
                    typeof window.renderSeriesChart !== 'undefined' &&
                    document.getElementById({id})) {{
                    clearInterval(poll);
                    try {{
                        window.renderSeriesChart({id}, {data});
                    }} catch(e) {{ console.error('[GeoDash] renderSeriesChart error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
        id = js_string(container_id),
        data = js_string(data_json),
    ));
}

/// Destroy/clean up a chart in the given container.
pub fn destroy_chart(container_id: &str) {
    call_js(&format!(
        "var el = document.getElementById({}); if (el) el.innerHTML = '';",
        js_string(container_id)
    ));
}

/// Offer `bytes` to the user as a file download.
pub fn download_bytes(file_name: &str, mime: &str, bytes: &[u8]) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}

/// Open `url` in a new browser tab.
pub fn open_external(url: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(err) = window.open_with_url_and_target(url, "_blank") {
                log::warn!("Failed to open {}: {:?}", url, err);
            }
        }
        None => log::warn!("No window to open {}", url),
    }
}

/// Write `text` to the system clipboard.
///
/// Uses the async Clipboard API when the page may, and a hidden textarea
/// with `execCommand('copy')` otherwise.
pub async fn copy_to_clipboard(text: &str) -> Result<(), JsValue> {
    let navigator = Reflect::get(&js_sys::global(), &JsValue::from_str("navigator"))?;
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if !clipboard.is_undefined() && !clipboard.is_null() {
        let write = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?;
        if let Ok(write) = write.dyn_into::<Function>() {
            let promise: Promise = write.call1(&clipboard, &JsValue::from_str(text))?.dyn_into()?;
            match JsFuture::from(promise).await {
                Ok(_) => return Ok(()),
                Err(err) => log::debug!("Clipboard API refused, trying execCommand: {:?}", err),
            }
        }
    }
    copy_with_textarea(text)
}

fn copy_with_textarea(text: &str) -> Result<(), JsValue> {
    let copied = js_sys::eval(&format!(
        r#"
        (function() {{
            var ta = document.createElement('textarea');
            ta.value = {text};
            ta.setAttribute('readonly', '');
            ta.style.position = 'fixed';
            ta.style.opacity = '0';
            document.body.appendChild(ta);
            ta.select();
            try {{ return document.execCommand('copy'); }}
            finally {{ document.body.removeChild(ta); }}
        }})()
        "#,
        text = js_string(text),
    ))?;
    if copied.as_bool() == Some(true) {
        Ok(())
    } else {
        Err(JsValue::from_str("execCommand('copy') was refused"))
    }
}

/// Resolve after `ms` milliseconds.
pub async fn sleep_ms(ms: u32) {
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        let scheduled = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
                .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}
