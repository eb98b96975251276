//! Statistics form: one request per reducer, strictly in sequence, merged
//! into a single chart.

use crate::backend::StatsBackend;
use crate::channel::{Channel, SubscriptionSet};
use crate::error::PanelError;
use chrono::NaiveDate;
use geodash_core::dates::parse_date;
use geodash_core::error::{MissingField, ValidationError};
use geodash_core::geometry::Bounds;
use geodash_core::stats::{ChartBuilder, ChartData, Reducer, StatsRequest};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Date range plus the checked layers and reducers, in the order they were
/// checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsForm {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    layers: Vec<String>,
    reducers: Vec<Reducer>,
}

impl StatsForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `YYYY-MM-DD` inputs; anything else clears the date.
    pub fn set_dates(&mut self, start: &str, end: &str) {
        self.start = parse_date(start).ok();
        self.end = parse_date(end).ok();
    }

    pub fn set_layer(&mut self, layer: &str, checked: bool) {
        if checked {
            if !self.layers.iter().any(|l| l == layer) {
                self.layers.push(layer.to_string());
            }
        } else {
            self.layers.retain(|l| l != layer);
        }
    }

    pub fn set_reducer(&mut self, reducer: Reducer, checked: bool) {
        if checked {
            if !self.reducers.contains(&reducer) {
                self.reducers.push(reducer);
            }
        } else {
            self.reducers.retain(|r| *r != reducer);
        }
    }

    pub fn toggle_layer(&mut self, layer: &str) {
        let checked = self.has_layer(layer);
        self.set_layer(layer, !checked);
    }

    pub fn toggle_reducer(&mut self, reducer: Reducer) {
        let checked = self.has_reducer(reducer);
        self.set_reducer(reducer, !checked);
    }

    pub fn has_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|l| l == layer)
    }

    pub fn has_reducer(&self, reducer: Reducer) -> bool {
        self.reducers.contains(&reducer)
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn reducers(&self) -> &[Reducer] {
        &self.reducers
    }
}

struct Inner<B> {
    backend: B,
    bounds_channel: Channel<Option<Bounds>>,
    bounds: Cell<Option<Bounds>>,
    loading: Cell<bool>,
    subscriptions: RefCell<SubscriptionSet>,
}

/// Clears the loading flag on every exit path, including a dropped future.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn start(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct StatisticsPanel<B: 'static> {
    inner: Rc<Inner<B>>,
}

impl<B: StatsBackend + 'static> StatisticsPanel<B> {
    pub fn new(backend: B, bounds: Channel<Option<Bounds>>) -> Self {
        Self {
            inner: Rc::new(Inner {
                backend,
                bounds_channel: bounds,
                bounds: Cell::new(None),
                loading: Cell::new(false),
                subscriptions: RefCell::new(SubscriptionSet::new()),
            }),
        }
    }

    /// Start tracking the drawn region.
    pub fn attach(&self) {
        if !self.inner.subscriptions.borrow().is_empty() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let subscription = self.inner.bounds_channel.subscribe(move |bounds: &Option<Bounds>| {
            if let Some(inner) = weak.upgrade() {
                if let Some(bounds) = bounds {
                    debug!("Statistics region {}", bounds.bbox_param());
                }
                inner.bounds.set(*bounds);
            }
        });
        self.inner.subscriptions.borrow_mut().push(subscription);
    }

    pub fn detach(&self) {
        let mut set = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        set.clear();
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.inner.bounds.get()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.get()
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Check the form against the current region, in display order.
    pub fn validate(&self, form: &StatsForm) -> Result<StatsRequest, ValidationError> {
        let mut missing = Vec::new();
        let bounds = self.inner.bounds.get();
        if bounds.is_none() {
            missing.push(MissingField::Polygon);
        }
        if form.start.is_none() || form.end.is_none() {
            missing.push(MissingField::DateRange);
        }
        if form.layers.is_empty() {
            missing.push(MissingField::LayerSelection);
        }
        if form.reducers.is_empty() {
            missing.push(MissingField::StatisticsSelection);
        }

        match (bounds, form.start, form.end) {
            (Some(bounds), Some(start), Some(end)) if missing.is_empty() => Ok(StatsRequest {
                bounds,
                start,
                end,
                layers: form.layers.clone(),
            }),
            _ => Err(ValidationError::new(missing)),
        }
    }

    /// Run one request per selected reducer, each awaited before the next.
    ///
    /// Any failure discards what was merged so far. A submission made while
    /// another is still running is rejected with [`PanelError::Busy`].
    pub async fn submit(&self, form: &StatsForm) -> Result<ChartData, PanelError> {
        if self.inner.loading.get() {
            warn!("Statistics request already in progress");
            return Err(PanelError::Busy);
        }
        let request = self.validate(form)?;
        let Some(_in_flight) = InFlight::start(&self.inner.loading) else {
            return Err(PanelError::Busy);
        };

        let mut builder = ChartBuilder::new();
        for (index, reducer) in form.reducers.iter().enumerate() {
            info!(
                "Fetching {} statistics ({}/{})",
                reducer,
                index + 1,
                form.reducers.len()
            );
            match self.inner.backend.fetch_reducer(*reducer, &request).await {
                Ok(response) => builder.push_response(*reducer, response),
                Err(err) => {
                    warn!("{} statistics failed: {}", reducer, err);
                    return Err(err.into());
                }
            }
        }

        let chart = builder.finish();
        info!(
            "Statistics ready: {} series over {} dates",
            chart.datasets.len(),
            chart.labels.len()
        );
        Ok(chart)
    }
}

impl<B: 'static> Drop for StatisticsPanel<B> {
    fn drop(&mut self) {
        let mut set = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, Gate};
    use geodash_core::error::FetchError;
    use geodash_core::geometry::LatLng;
    use std::future::{poll_fn, Future};
    use std::pin::pin;
    use std::task::Poll;

    fn region() -> Bounds {
        Bounds::from_corners(LatLng::new(35.2, 9.1), LatLng::new(35.9, 10.4))
    }

    fn panel_with(backend: FakeBackend) -> (Channel<Option<Bounds>>, StatisticsPanel<FakeBackend>) {
        let bounds = Channel::new(None);
        let panel = StatisticsPanel::new(backend, bounds.clone());
        panel.attach();
        bounds.set(Some(region()));
        (bounds, panel)
    }

    fn form(reducers: &[Reducer]) -> StatsForm {
        let mut form = StatsForm::new();
        form.set_dates("2024-01-01", "2024-03-31");
        form.set_layer("NDVI", true);
        for reducer in reducers {
            form.set_reducer(*reducer, true);
        }
        form
    }

    #[test]
    fn toggles_keep_selection_order() {
        let mut form = StatsForm::new();
        form.toggle_reducer(Reducer::Max);
        form.toggle_reducer(Reducer::Mean);
        form.set_reducer(Reducer::Max, true);
        assert_eq!(form.reducers(), &[Reducer::Max, Reducer::Mean]);
        form.toggle_reducer(Reducer::Max);
        assert_eq!(form.reducers(), &[Reducer::Mean]);

        form.toggle_layer("NDWI");
        form.toggle_layer("NDVI");
        form.toggle_layer("NDWI");
        assert_eq!(form.layers(), &["NDVI".to_string()]);
        assert!(form.has_layer("NDVI"));
    }

    #[test]
    fn tracks_bounds_channel_until_detached() {
        let (bounds, panel) = panel_with(FakeBackend::default());
        assert_eq!(panel.bounds(), Some(region()));
        panel.detach();
        bounds.set(None);
        assert_eq!(panel.bounds(), Some(region()));
        assert_eq!(bounds.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn empty_form_reports_every_field() {
        let backend = FakeBackend::default();
        let panel = StatisticsPanel::new(backend.clone(), Channel::new(None));
        panel.attach();
        let err = panel.submit(&StatsForm::new()).await.unwrap_err();
        match err {
            PanelError::Validation(err) => assert_eq!(
                err.labels(),
                vec!["polygon", "date range", "layer selection", "statistics selection"]
            ),
            other => panic!("unexpected {:?}", other),
        }
        assert!(backend.called_reducers().is_empty());
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn reducers_run_in_order_and_merge() {
        let backend = FakeBackend::default();
        backend.respond(
            Reducer::Mean,
            "NDVI",
            &[("2024-01-05", Some(0.31)), ("2024-01-15", Some(0.35))],
        );
        backend.respond(
            Reducer::Max,
            "NDVI",
            &[("2024-01-10", Some(0.62)), ("2024-01-15", None)],
        );
        let (_bounds, panel) = panel_with(backend.clone());

        let chart = panel.submit(&form(&[Reducer::Mean, Reducer::Max])).await.unwrap();

        assert_eq!(backend.called_reducers(), vec![Reducer::Mean, Reducer::Max]);
        assert_eq!(chart.labels, vec!["2024-01-05", "2024-01-10", "2024-01-15"]);
        let mean = chart.series("NDVI", Reducer::Mean).unwrap();
        assert_eq!(mean.label, "NDVI (mean)");
        assert_eq!(mean.values, vec![0.31, 0.0, 0.35]);
        let max = chart.series("NDVI", Reducer::Max).unwrap();
        assert_eq!(max.values, vec![0.0, 0.62, 0.0]);
        assert_eq!(max.color, "#F44336");

        let requests = backend.requests();
        let request = &requests[0];
        assert_eq!(request.bounds, region());
        assert_eq!(request.layers, vec!["NDVI".to_string()]);
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn failure_stops_remaining_reducers() {
        let backend = FakeBackend::default();
        backend.respond(Reducer::Mean, "NDVI", &[("2024-01-05", Some(0.3))]);
        backend.fail(Reducer::Min, FetchError::Transport("connection refused".to_string()));
        let (_bounds, panel) = panel_with(backend.clone());

        let err = panel
            .submit(&form(&[Reducer::Mean, Reducer::Min, Reducer::Std]))
            .await
            .unwrap_err();
        assert!(matches!(err, PanelError::Transport(_)));
        assert_eq!(backend.called_reducers(), vec![Reducer::Mean, Reducer::Min]);
        assert!(!panel.is_loading());

        let chart = panel.submit(&form(&[Reducer::Mean])).await.unwrap();
        assert_eq!(chart.datasets.len(), 1);
    }

    #[tokio::test]
    async fn second_submission_while_running_is_busy() {
        let gate = Rc::new(Gate::default());
        let backend = FakeBackend::gated(Rc::clone(&gate));
        backend.respond(Reducer::Std, "NDVI", &[("2024-02-01", Some(0.05))]);
        let (_bounds, panel) = panel_with(backend.clone());
        let form = form(&[Reducer::Std]);

        let mut first = pin!(panel.submit(&form));
        poll_fn(|cx| {
            assert!(first.as_mut().poll(cx).is_pending());
            Poll::Ready(())
        })
        .await;
        assert!(panel.is_loading());

        assert_eq!(panel.submit(&form).await, Err(PanelError::Busy));
        assert_eq!(backend.called_reducers().len(), 1);

        gate.open();
        let chart = first.await.unwrap();
        assert_eq!(chart.labels, vec!["2024-02-01"]);
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn dropped_submission_clears_loading() {
        let gate = Rc::new(Gate::default());
        let (_bounds, panel) = panel_with(FakeBackend::gated(gate));
        let form = form(&[Reducer::Mean]);
        {
            let mut pending = pin!(panel.submit(&form));
            poll_fn(|cx| {
                assert!(pending.as_mut().poll(cx).is_pending());
                Poll::Ready(())
            })
            .await;
            assert!(panel.is_loading());
        }
        assert!(!panel.is_loading());
    }
}
