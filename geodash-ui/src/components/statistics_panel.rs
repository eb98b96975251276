//! Statistics form and chart.

use super::{Checkbox, ErrorDisplay};
use crate::hooks::use_channel;
use crate::js_bridge;
use crate::state::{chart_after_submit, AppState, ResetOnDrop, Services};
use dioxus::prelude::*;
use geodash_core::stats::Reducer;
use geodash_state::statistics_panel::{StatisticsPanel, StatsForm};
use std::rc::Rc;

const CHART_CONTAINER_ID: &str = "geodash-stats-chart";

#[component]
pub fn StatisticsPanelView() -> Element {
    let services = use_context::<Services>();
    let mut state = use_context::<AppState>();
    let panel = use_hook(|| {
        let panel = Rc::new(StatisticsPanel::new(
            services.client.clone(),
            services.channels.bounds.clone(),
        ));
        panel.attach();
        panel
    });
    let drop_panel = panel.clone();
    use_drop(move || drop_panel.detach());

    let bounds = use_channel(&services.channels.bounds);
    let mut form = use_signal(StatsForm::new);
    let mut start = use_signal(String::new);
    let mut end = use_signal(String::new);
    let mut error_msg = use_signal(|| None::<String>);

    // Redraw when a new chart arrives
    use_effect(move || match (state.chart)() {
        Some(chart) => match serde_json::to_string(&chart) {
            Ok(json) => js_bridge::render_series_chart(CHART_CONTAINER_ID, &json),
            Err(err) => log::error!("Failed to serialize chart: {}", err),
        },
        None => js_bridge::destroy_chart(CHART_CONTAINER_ID),
    });

    let submit_panel = panel.clone();
    let on_submit = move |_| {
        let panel = submit_panel.clone();
        if panel.is_loading() {
            return;
        }
        let mut current = form();
        current.set_dates(&start(), &end());
        error_msg.set(None);
        spawn(async move {
            let mut loading = state.stats_loading;
            loading.set(true);
            // Unmounting the view cancels this task mid-request
            let _loading = ResetOnDrop::new(move || loading.set(false));
            let result = panel.submit(&current).await;
            let previous = state.chart.peek().clone();
            state.chart.set(chart_after_submit(previous, &result));
            if let Err(err) = result {
                error_msg.set(Some(err.to_string()));
            }
        });
    };

    let on_layer = move |layer: String| form.write().toggle_layer(&layer);
    let on_reducer = move |value: String| match value.parse::<Reducer>() {
        Ok(reducer) => form.write().toggle_reducer(reducer),
        Err(err) => log::warn!("{}", err),
    };

    let loading = (state.stats_loading)();
    let has_chart = (state.chart)().is_some();
    let region = match bounds() {
        Some(b) => format!("Region {}", b.bbox_param()),
        None => "Draw a polygon on the map to select a region".to_string(),
    };
    let layers = services.config.statistics_layers.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px;",
            p { style: "margin: 0; font-size: 12px; color: #aaa;", "{region}" }
            label { "Start date"
                input {
                    r#type: "date",
                    value: "{start}",
                    oninput: move |evt| start.set(evt.value()),
                }
            }
            label { "End date"
                input {
                    r#type: "date",
                    value: "{end}",
                    oninput: move |evt| end.set(evt.value()),
                }
            }
            fieldset {
                legend { "Layers" }
                for name in layers.iter() {
                    Checkbox {
                        key: "{name}",
                        label: name.clone(),
                        checked: form.read().has_layer(name),
                        value: name.clone(),
                        on_toggle: on_layer,
                    }
                }
            }
            fieldset {
                legend { "Statistics" }
                for reducer in Reducer::ALL {
                    Checkbox {
                        key: "{reducer.as_str()}",
                        label: reducer.label().to_string(),
                        checked: form.read().has_reducer(reducer),
                        value: reducer.as_str().to_string(),
                        on_toggle: on_reducer,
                    }
                }
            }
            button {
                disabled: loading,
                onclick: on_submit,
                if loading { "Loading..." } else { "Submit" }
            }
            if let Some(message) = error_msg() {
                ErrorDisplay { message }
            }
            if loading || has_chart {
                div {
                    style: "margin-bottom: 8px;",
                    h4 { style: "margin: 0 0 4px 0; font-size: 14px;", "Chart" }
                    if !start().is_empty() || !end().is_empty() {
                        p { style: "margin: 0; font-size: 12px; color: #aaa;", "{start} to {end}" }
                    }
                }
            }
            div {
                style: "min-height: 300px; position: relative; width: 100%;",
                if loading {
                    div {
                        style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #aaa;",
                        "Fetching statistics..."
                    }
                }
                // D3 renders into this element
                div { id: CHART_CONTAINER_ID, style: "width: 100%;" }
            }
        }
    }
}
