//! Recording fakes for the renderer, address bar and HTTP seams.

use crate::backend::{Clipboard, ImageFetcher, StatsBackend};
use crate::map_surface::{MapNotice, MapRenderer};
use crate::view_sync::AddressBar;
use geodash_core::error::FetchError;
use geodash_core::geometry::{Bounds, LatLng};
use geodash_core::layers::{BaseLayer, LayerSource};
use geodash_core::stats::{Reducer, ReducerResponse, StatsRequest};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::poll_fn;
use std::rc::Rc;
use std::task::{Poll, Waker};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    ShowBase(BaseLayer),
    HideBase(BaseLayer),
    ClearDrawn,
    DrawPolygon(usize),
    FitBounds(Bounds),
    ShowOverlay { url: String, opacity: f64 },
    RemoveOverlay,
    Opacity(f64),
    Notice(MapNotice),
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    calls: Rc<RefCell<Vec<RenderCall>>>,
    live_polygons: Rc<Cell<usize>>,
}

impl RecordingRenderer {
    /// Polygons currently on the map: cleared by `clear_drawn`.
    pub fn live_polygons(&self) -> usize {
        self.live_polygons.get()
    }

    pub fn overlays_shown(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, RenderCall::ShowOverlay { .. }))
            .count()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }

    pub fn take(&self) -> Vec<RenderCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: RenderCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl MapRenderer for RecordingRenderer {
    fn show_base_layer(&self, layer: BaseLayer, _source: &LayerSource) {
        self.record(RenderCall::ShowBase(layer));
    }

    fn hide_base_layer(&self, layer: BaseLayer) {
        self.record(RenderCall::HideBase(layer));
    }

    fn clear_drawn(&self) {
        self.live_polygons.set(0);
        self.record(RenderCall::ClearDrawn);
    }

    fn draw_polygon(&self, vertices: &[LatLng]) {
        self.live_polygons.set(self.live_polygons.get() + 1);
        self.record(RenderCall::DrawPolygon(vertices.len()));
    }

    fn fit_bounds(&self, bounds: &Bounds) {
        self.record(RenderCall::FitBounds(*bounds));
    }

    fn show_overlay(&self, url: &str, _bounds: &Bounds, opacity: f64) {
        self.record(RenderCall::ShowOverlay {
            url: url.to_string(),
            opacity,
        });
    }

    fn remove_overlay(&self) {
        self.record(RenderCall::RemoveOverlay);
    }

    fn set_overlay_opacity(&self, opacity: f64) {
        self.record(RenderCall::Opacity(opacity));
    }

    fn notify(&self, notice: &MapNotice) {
        self.record(RenderCall::Notice(*notice));
    }
}

/// Address bar that keeps every replaced query.
#[derive(Clone, Default)]
pub struct MemoryAddressBar {
    query: Rc<RefCell<String>>,
    writes: Rc<RefCell<Vec<String>>>,
}

impl MemoryAddressBar {
    pub fn with_query(query: &str) -> Self {
        let bar = Self::default();
        *bar.query.borrow_mut() = query.to_string();
        bar
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl AddressBar for MemoryAddressBar {
    fn query(&self) -> String {
        self.query.borrow().clone()
    }

    fn replace_query(&self, query: &str) {
        *self.query.borrow_mut() = query.to_string();
        self.writes.borrow_mut().push(query.to_string());
    }

    fn href(&self) -> String {
        format!("https://geodash.test/{}", self.query.borrow())
    }
}

/// Clipboard that keeps what was written, or refuses every write.
#[derive(Clone, Default)]
pub struct FakeClipboard {
    refusal: Option<String>,
    copied: Rc<RefCell<Vec<String>>>,
}

impl FakeClipboard {
    pub fn refusing(reason: &str) -> Self {
        Self {
            refusal: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.borrow().clone()
    }
}

impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        if let Some(reason) = &self.refusal {
            return Err(reason.clone());
        }
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Lets a test hold a request open until it says so.
#[derive(Default)]
pub struct Gate {
    open: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

impl Gate {
    pub fn open(&self) {
        self.open.set(true);
        if let Some(waker) = self.waker.borrow_mut().take() {
            waker.wake();
        }
    }

    async fn pass(&self) {
        poll_fn(|cx| {
            if self.open.get() {
                Poll::Ready(())
            } else {
                *self.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        })
        .await
    }
}

/// Canned statistics responses keyed by reducer; records call order.
#[derive(Clone, Default)]
pub struct FakeBackend {
    responses: Rc<RefCell<HashMap<Reducer, ReducerResponse>>>,
    failures: Rc<RefCell<HashMap<Reducer, FetchError>>>,
    calls: Rc<RefCell<Vec<(Reducer, StatsRequest)>>>,
    gate: Option<Rc<Gate>>,
}

impl FakeBackend {
    pub fn respond(&self, reducer: Reducer, layer: &str, points: &[(&str, Option<f64>)]) {
        let mut responses = self.responses.borrow_mut();
        let body = responses.entry(reducer).or_default();
        body.insert(
            layer.to_string(),
            points
                .iter()
                .map(|(date, value)| (date.to_string(), *value))
                .collect(),
        );
    }

    pub fn fail(&self, reducer: Reducer, error: FetchError) {
        self.failures.borrow_mut().insert(reducer, error);
    }

    pub fn gated(gate: Rc<Gate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn called_reducers(&self) -> Vec<Reducer> {
        self.calls.borrow().iter().map(|(reducer, _)| *reducer).collect()
    }

    pub fn requests(&self) -> Vec<StatsRequest> {
        self.calls.borrow().iter().map(|(_, request)| request.clone()).collect()
    }
}

impl StatsBackend for FakeBackend {
    async fn fetch_reducer(
        &self,
        reducer: Reducer,
        request: &StatsRequest,
    ) -> Result<ReducerResponse, FetchError> {
        self.calls.borrow_mut().push((reducer, request.clone()));
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        if let Some(error) = self.failures.borrow().get(&reducer) {
            return Err(error.clone());
        }
        Ok(self
            .responses
            .borrow()
            .get(&reducer)
            .cloned()
            .unwrap_or_default())
    }
}

/// Returns fixed bytes, or an error when configured to.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    bytes: Vec<u8>,
    error: Option<FetchError>,
    fetched: Rc<RefCell<Vec<String>>>,
}

impl FakeFetcher {
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ..Self::default()
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl ImageFetcher for FakeFetcher {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetched.borrow_mut().push(url.to_string());
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.bytes.clone()),
        }
    }
}
