//! The set of channels one dashboard instance shares between components.

use crate::channel::Channel;
use geodash_core::config::DashConfig;
use geodash_core::geometry::Bounds;
use geodash_core::ogc::OgcParams;
use geodash_core::view_state::{ViewState, Viewport};

/// Clamp to `[0, 1]`; NaN becomes fully transparent.
pub fn clamp_opacity(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Built once at startup and handed to every component that needs it.
#[derive(Clone, Debug)]
pub struct StateChannels {
    /// Canonical base layer name (see `BaseLayer::name`)
    pub base_layer: Channel<String>,
    /// Bounding box of the last drawn polygon
    pub bounds: Channel<Option<Bounds>>,
    pub ogc_params: Channel<OgcParams>,
    /// Last overlay URL published by the map surface
    pub wms_url: Channel<Option<String>>,
    pub opacity: Channel<f64>,
    pub viewport: Channel<Viewport>,
}

impl StateChannels {
    /// `initial_view` is usually the address-bar view resolved against the
    /// configured defaults, so the first replay already carries it.
    pub fn new(config: &DashConfig, initial_view: &ViewState) -> Self {
        log::debug!(
            "Creating state channels (layer {}, stats at {})",
            initial_view.layer,
            config.stats_base_url
        );
        Self {
            base_layer: Channel::new(initial_view.layer.name().to_string()),
            bounds: Channel::new(None),
            ogc_params: Channel::new(OgcParams::default()),
            wms_url: Channel::new(None),
            opacity: Channel::with_normalizer(1.0, clamp_opacity),
            viewport: Channel::new(initial_view.viewport),
        }
    }

    pub fn with_defaults(config: &DashConfig) -> Self {
        Self::new(config, &config.default_view())
    }

    pub fn has_region(&self) -> bool {
        self.bounds.get().is_some()
    }
}
