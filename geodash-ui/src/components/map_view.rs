//! The full-screen Leaflet map.

use super::ErrorDisplay;
use crate::browser::LeafletRenderer;
use crate::js_bridge;
use crate::state::{AppState, Services};
use dioxus::prelude::*;
use geodash_core::geometry::LatLng;
use geodash_core::view_state::Viewport;
use geodash_state::map_surface::MapSurface;
use std::cell::RefCell;
use std::rc::Rc;

const MAP_CONTAINER_ID: &str = "geodash-map";

/// Mounts the map, keeps it in step with the state channels and feeds drawn
/// polygons and pan/zoom events back into them.
#[component]
pub fn MapView() -> Element {
    let services = use_context::<Services>();
    let mut state = use_context::<AppState>();

    let surface = use_hook(|| {
        let surface = Rc::new(MapSurface::new(
            LeafletRenderer::new(state.notice),
            services.channels.clone(),
            &services.config,
        ));
        let viewport = services.channels.viewport.get();
        js_bridge::load_libraries();
        js_bridge::init_map(MAP_CONTAINER_ID, viewport.center, viewport.zoom);
        surface.attach();
        surface
    });

    let callbacks = use_hook(|| {
        let polygon_target = Rc::downgrade(&surface);
        let move_target = Rc::downgrade(&surface);
        let callbacks = js_bridge::register_map_callbacks(
            move |vertices| {
                if let Some(surface) = polygon_target.upgrade() {
                    surface.complete_polygon(vertices);
                }
            },
            move |lat, lng, zoom| {
                if let Some(surface) = move_target.upgrade() {
                    surface.viewport_changed(Viewport {
                        center: LatLng::new(lat, lng),
                        zoom,
                    });
                }
            },
        );
        Rc::new(RefCell::new(Some(callbacks)))
    });

    use_drop(move || {
        callbacks.borrow_mut().take();
        surface.detach();
        js_bridge::destroy_map();
    });

    rsx! {
        div {
            style: "position: relative; width: 100%; height: 100vh;",
            div {
                id: MAP_CONTAINER_ID,
                style: "position: absolute; top: 0; right: 0; bottom: 0; left: 0;",
            }
            if let Some(message) = (state.notice)() {
                div {
                    style: "position: absolute; bottom: 24px; left: 50%; transform: translateX(-50%); z-index: 1000; min-width: 280px;",
                    ErrorDisplay { title: "Notice", message }
                    button {
                        style: "float: right; font-size: 12px;",
                        onclick: move |_| state.notice.set(None),
                        "Dismiss"
                    }
                }
            }
        }
    }
}
