//! GeoDash map dashboard
//!
//! A full-screen Leaflet map with three floating panels: a base map picker,
//! an imagery form that overlays a WMS GetMap image on the drawn region, and
//! a statistics form that charts reducer time series for that region.
//!
//! Startup:
//! 1. The address bar query (`lat`, `lng`, `z`, `layer`) seeds the view,
//!    falling back to the compiled default config field by field.
//! 2. The state channels are built from it and shared through context.
//! 3. The view is mirrored back into the address bar while the app runs.

use dioxus::prelude::*;
use geodash_core::config::DashConfig;
use geodash_state::view_sync::{initial_view, ViewSync};
use geodash_state::StateChannels;
use geodash_ui::browser::BrowserAddressBar;
use geodash_ui::components::{MapView, OverlayControls};
use geodash_ui::state::{AppState, Services};
use std::rc::Rc;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("geodash-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let services = use_context_provider(|| {
        let config = DashConfig::default();
        let view = initial_view(&BrowserAddressBar, &config);
        log::info!(
            "Starting at {:.5},{:.5} z{} on {}",
            view.viewport.center.lat,
            view.viewport.center.lng,
            view.viewport.zoom,
            view.layer.name()
        );
        let channels = StateChannels::new(&config, &view);
        Services::new(config, channels)
    });
    use_context_provider(AppState::new);

    let view_sync = use_hook(|| {
        let sync = Rc::new(ViewSync::new(
            BrowserAddressBar,
            services.channels.clone(),
            services.config.default_base_layer,
        ));
        sync.attach();
        sync
    });
    use_drop(move || view_sync.detach());

    rsx! {
        div {
            style: "position: relative; width: 100vw; height: 100vh; overflow: hidden; margin: 0; background: #111;",
            MapView {}
            OverlayControls {}
        }
    }
}
