//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the reactive signals the panels render from into a
//! single `Copy` struct provided via `use_context_provider`. The long-lived,
//! non-reactive pieces (config, state channels, HTTP client) travel together
//! as `Services`. Child components retrieve them with `use_context`.

use dioxus::prelude::*;
use geodash_core::client::HttpClient;
use geodash_core::config::DashConfig;
use geodash_core::stats::ChartData;
use geodash_state::{PanelError, StateChannels};
use std::rc::Rc;

/// Side panels; at most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Layers,
    Imagery,
    Statistics,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Layers, Panel::Imagery, Panel::Statistics];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Layers => "Base maps",
            Panel::Imagery => "Imagery",
            Panel::Statistics => "Statistics",
        }
    }

    /// Clicking the open panel closes it; clicking another one switches.
    pub fn toggle(current: Option<Panel>, clicked: Panel) -> Option<Panel> {
        if current == Some(clicked) {
            None
        } else {
            Some(clicked)
        }
    }
}

/// Shared reactive state for the dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Non-fatal message from the map (e.g. no region drawn)
    pub notice: Signal<Option<String>>,
    /// Currently open side panel
    pub active_panel: Signal<Option<Panel>>,
    /// Whether a statistics submission is running
    pub stats_loading: Signal<bool>,
    /// Last combined statistics chart
    pub chart: Signal<Option<ChartData>>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            notice: Signal::new(None),
            active_panel: Signal::new(Some(Panel::Imagery)),
            stats_loading: Signal::new(false),
            chart: Signal::new(None),
        }
    }
}

/// Chart to show once a submission settles: the new one on success, none
/// after a failed request, and the previous one when nothing was sent.
pub fn chart_after_submit(
    previous: Option<ChartData>,
    result: &Result<ChartData, PanelError>,
) -> Option<ChartData> {
    match result {
        Ok(chart) => Some(chart.clone()),
        Err(PanelError::Transport(_)) => None,
        Err(_) => previous,
    }
}

/// Runs `reset` when dropped, so a cancelled task still undoes its flag.
pub struct ResetOnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> ResetOnDrop<F> {
    pub fn new(reset: F) -> Self {
        Self(Some(reset))
    }
}

impl<F: FnOnce()> Drop for ResetOnDrop<F> {
    fn drop(&mut self) {
        if let Some(reset) = self.0.take() {
            reset();
        }
    }
}

/// Config, channels and HTTP client for one dashboard instance.
#[derive(Clone)]
pub struct Services {
    pub config: Rc<DashConfig>,
    pub channels: StateChannels,
    pub client: HttpClient,
}

impl Services {
    pub fn new(config: DashConfig, channels: StateChannels) -> Self {
        let client = HttpClient::new(config.stats_base_url.clone());
        Self {
            config: Rc::new(config),
            channels,
            client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodash_core::error::{FetchError, MissingField, ValidationError};
    use std::cell::Cell;
    use std::future::{pending, Future};
    use std::task::{Context, Waker};

    fn chart(label: &str) -> ChartData {
        ChartData {
            labels: vec![label.to_string()],
            ..ChartData::default()
        }
    }

    #[test]
    fn only_one_panel_open() {
        assert_eq!(Panel::toggle(Some(Panel::Imagery), Panel::Imagery), None);
        assert_eq!(Panel::toggle(Some(Panel::Imagery), Panel::Statistics), Some(Panel::Statistics));
        assert_eq!(Panel::toggle(None, Panel::Layers), Some(Panel::Layers));
    }

    #[test]
    fn rejected_submission_keeps_chart() {
        let previous = Some(chart("2024-01-01"));
        let invalid = Err(PanelError::Validation(ValidationError::new(vec![MissingField::DateRange])));
        assert_eq!(chart_after_submit(previous.clone(), &invalid), previous);
        assert_eq!(chart_after_submit(previous.clone(), &Err(PanelError::Busy)), previous);
    }

    #[test]
    fn failed_request_clears_chart_and_success_replaces_it() {
        let previous = Some(chart("2024-01-01"));
        let failed = Err(PanelError::Transport(FetchError::Transport("offline".to_string())));
        assert_eq!(chart_after_submit(previous.clone(), &failed), None);
        let fresh = chart("2024-02-01");
        assert_eq!(chart_after_submit(previous, &Ok(fresh.clone())), Some(fresh));
    }

    #[test]
    fn cancelled_task_resets_flag() {
        let loading = Rc::new(Cell::new(false));
        let flag = loading.clone();
        let task = async move {
            flag.set(true);
            let reset = flag.clone();
            let _reset = ResetOnDrop::new(move || reset.set(false));
            pending::<()>().await;
        };
        let mut task = Box::pin(task);
        let mut cx = Context::from_waker(Waker::noop());
        assert!(task.as_mut().poll(&mut cx).is_pending());
        assert!(loading.get());
        drop(task);
        assert!(!loading.get());
    }
}
