//! The map: base layer, the single drawn region and the imagery overlay.
//!
//! `MapSurface` owns no drawing code. It decides what the map should show and
//! tells a [`MapRenderer`] to do it. Renderer calls are never made while an
//! internal borrow is held, so a renderer may publish back into the channels.

use crate::channel::SubscriptionSet;
use crate::channels::StateChannels;
use crate::error::PanelError;
use geodash_core::config::DashConfig;
use geodash_core::geometry::{Bounds, LatLng};
use geodash_core::layers::{BaseLayer, LayerSource};
use geodash_core::ogc::OgcParams;
use geodash_core::view_state::Viewport;
use geodash_core::wms::GetMap;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Something the map tells the user without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapNotice {
    NoRegionSelected,
}

impl fmt::Display for MapNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapNotice::NoRegionSelected => {
                write!(f, "Please draw a polygon on the map before requesting imagery.")
            }
        }
    }
}

/// Drawing backend for the map surface.
pub trait MapRenderer {
    fn show_base_layer(&self, layer: BaseLayer, source: &LayerSource);
    fn hide_base_layer(&self, layer: BaseLayer);
    /// Remove every drawn shape.
    fn clear_drawn(&self);
    fn draw_polygon(&self, vertices: &[LatLng]);
    fn fit_bounds(&self, bounds: &Bounds);
    fn show_overlay(&self, url: &str, bounds: &Bounds, opacity: f64);
    fn remove_overlay(&self);
    fn set_overlay_opacity(&self, opacity: f64);
    fn notify(&self, notice: &MapNotice);
}

struct Inner<R> {
    renderer: R,
    channels: StateChannels,
    wms_endpoint: String,
    image_size: (u32, u32),
    active_layer: Cell<Option<BaseLayer>>,
    /// URL and region of the overlay on screen
    overlay: RefCell<Option<(String, Bounds)>>,
    subscriptions: RefCell<SubscriptionSet>,
}

pub struct MapSurface<R: MapRenderer + 'static> {
    inner: Rc<Inner<R>>,
}

impl<R: MapRenderer + 'static> MapSurface<R> {
    pub fn new(renderer: R, channels: StateChannels, config: &DashConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                renderer,
                channels,
                wms_endpoint: config.wms_endpoint.clone(),
                image_size: (config.image_width, config.image_height),
                active_layer: Cell::new(None),
                overlay: RefCell::new(None),
                subscriptions: RefCell::new(SubscriptionSet::new()),
            }),
        }
    }

    /// Subscribe to the base-layer, parameters, bounds and opacity channels
    /// and render what they currently hold. Attaching twice is a no-op.
    pub fn attach(&self) {
        if !self.inner.subscriptions.borrow().is_empty() {
            debug!("Map surface already attached");
            return;
        }

        let channels = &self.inner.channels;
        let mut subscriptions = Vec::with_capacity(4);

        let weak = Rc::downgrade(&self.inner);
        subscriptions.push(channels.base_layer.subscribe(move |name: &String| {
            if let Some(inner) = weak.upgrade() {
                inner.apply_base_layer(name);
            }
        }));

        let weak = Rc::downgrade(&self.inner);
        subscriptions.push(channels.ogc_params.subscribe(move |params: &OgcParams| {
            if let Some(inner) = weak.upgrade() {
                inner.apply_params(params);
            }
        }));

        let weak = Rc::downgrade(&self.inner);
        subscriptions.push(channels.bounds.subscribe(move |bounds: &Option<Bounds>| {
            if let Some(inner) = weak.upgrade() {
                inner.refresh_overlay(bounds);
            }
        }));

        let weak: Weak<Inner<R>> = Rc::downgrade(&self.inner);
        subscriptions.push(channels.opacity.subscribe(move |opacity: &f64| {
            if let Some(inner) = weak.upgrade() {
                if inner.overlay.borrow().is_some() {
                    inner.renderer.set_overlay_opacity(*opacity);
                }
            }
        }));

        let mut set = self.inner.subscriptions.borrow_mut();
        for subscription in subscriptions {
            set.push(subscription);
        }
        info!("Map surface attached");
    }

    /// Release every subscription. Safe to call more than once.
    pub fn detach(&self) {
        let mut set = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        if !set.is_empty() {
            set.clear();
            info!("Map surface detached");
        }
    }

    /// A polygon was finished on the map.
    ///
    /// Replaces any earlier polygon, fits the view to the new one and
    /// publishes its bounding box. Returns `None` for an empty ring.
    pub fn complete_polygon(&self, vertices: Vec<LatLng>) -> Option<Bounds> {
        let Some(bounds) = Bounds::from_points(&vertices) else {
            debug!("Ignoring empty polygon");
            return None;
        };

        let renderer = &self.inner.renderer;
        renderer.clear_drawn();
        renderer.draw_polygon(&vertices);
        renderer.fit_bounds(&bounds);

        info!("Polygon drawn, bounds {}", bounds.bbox_param());
        self.inner.channels.bounds.set(Some(bounds));
        Some(bounds)
    }

    /// The user panned or zoomed.
    pub fn viewport_changed(&self, viewport: Viewport) {
        if self.inner.channels.viewport.get() != viewport {
            self.inner.channels.viewport.set(viewport);
        }
    }

    pub fn active_layer(&self) -> Option<BaseLayer> {
        self.inner.active_layer.get()
    }

    pub fn has_overlay(&self) -> bool {
        self.inner.overlay.borrow().is_some()
    }

    pub fn overlay_url(&self) -> Option<String> {
        self.inner.overlay.borrow().as_ref().map(|(url, _)| url.clone())
    }

    pub fn renderer(&self) -> &R {
        &self.inner.renderer
    }
}

impl<R: MapRenderer + 'static> Drop for MapSurface<R> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<R: MapRenderer> Inner<R> {
    fn apply_base_layer(&self, name: &str) {
        let Some(layer) = BaseLayer::from_name(name) else {
            warn!("Unknown base layer '{}', keeping current layer", name);
            return;
        };

        let previous = self.active_layer.get();
        if previous == Some(layer) {
            return;
        }
        if let Some(previous) = previous {
            self.renderer.hide_base_layer(previous);
        }
        self.renderer
            .show_base_layer(layer, &layer.source(&self.wms_endpoint));
        self.active_layer.set(Some(layer));
        info!("Base layer switched to {}", layer);
    }

    fn apply_params(&self, params: &OgcParams) {
        if params.is_empty() {
            debug!("No imagery parameters yet");
            return;
        }

        match self.overlay_request(params) {
            Ok((url, _)) if self.overlay_url_is(&url) => {
                debug!("Overlay already on screen");
            }
            Ok((url, bounds)) => self.show_overlay(url, bounds),
            Err(PanelError::NoRegion) => {
                warn!("Imagery requested without a drawn region");
                self.renderer.notify(&MapNotice::NoRegionSelected);
            }
            Err(err) => warn!("Skipping overlay: {}", err),
        }
    }

    /// A new region moves an overlay that is already on screen.
    fn refresh_overlay(&self, bounds: &Option<Bounds>) {
        let Some(bounds) = bounds else {
            return;
        };
        match &*self.overlay.borrow() {
            Some((_, shown)) if shown != bounds => {}
            _ => return,
        }
        let params = self.channels.ogc_params.get();
        if let Ok((url, bounds)) = self.overlay_request(&params) {
            self.show_overlay(url, bounds);
        }
    }

    fn overlay_url_is(&self, url: &str) -> bool {
        self.overlay
            .borrow()
            .as_ref()
            .is_some_and(|(shown, _)| shown == url)
    }

    fn overlay_request(&self, params: &OgcParams) -> Result<(String, Bounds), PanelError> {
        let query = params.complete()?;
        let bounds = self.channels.bounds.get().ok_or(PanelError::NoRegion)?;
        let (width, height) = self.image_size;
        let url = GetMap::new(&query, bounds)
            .size(width, height)
            .url(&self.wms_endpoint);
        Ok((url, bounds))
    }

    fn show_overlay(&self, url: String, bounds: Bounds) {
        let replaced = self.overlay.borrow_mut().take().is_some();
        if replaced {
            self.renderer.remove_overlay();
        }
        self.renderer
            .show_overlay(&url, &bounds, self.channels.opacity.get());
        self.renderer.fit_bounds(&bounds);
        *self.overlay.borrow_mut() = Some((url.clone(), bounds));

        info!("Overlay requested: {}", url);
        self.channels.wms_url.set(Some(url));
    }
}
