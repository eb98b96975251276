//! Imagery request form, opacity slider, legend and export.

use super::ErrorDisplay;
use crate::hooks::use_channel;
use crate::js_bridge;
use crate::state::Services;
use dioxus::prelude::*;
use geodash_core::ogc::ExportFormat;
use geodash_state::imagery_panel::{ExportOutcome, ImageryForm, ImageryPanel};
use std::rc::Rc;

const SUBMITTED: &str = "Your request has been submitted successfully.";

#[derive(Clone, PartialEq)]
enum Feedback {
    Success(String),
    Error(String),
}

#[component]
pub fn ImageryPanelView() -> Element {
    let services = use_context::<Services>();
    let panel = use_hook(|| {
        Rc::new(ImageryPanel::new(
            services.channels.clone(),
            services.client.clone(),
        ))
    });
    let wms_url = use_channel(&services.channels.wms_url);
    let opacity = use_channel(&services.channels.opacity);

    let mut start = use_signal(String::new);
    let mut end = use_signal(String::new);
    let mut cloud = use_signal(|| services.config.default_cloud_percentage.to_string());
    let mut layer = use_signal(String::new);
    let mut export_format = use_signal(|| ExportFormat::Png.mime().to_string());
    let mut feedback = use_signal(|| None::<Feedback>);
    let mut exporting = use_signal(|| false);

    let submit_panel = panel.clone();
    let on_submit = move |_| {
        let form = ImageryForm::from_inputs(&start(), &end(), &cloud(), &layer());
        match submit_panel.submit(&form) {
            Ok(()) => feedback.set(Some(Feedback::Success(SUBMITTED.to_string()))),
            Err(err) => feedback.set(Some(Feedback::Error(err.to_string()))),
        }
    };

    let export_panel = panel.clone();
    let on_export = move |_| {
        let panel = export_panel.clone();
        let mime = export_format();
        exporting.set(true);
        spawn(async move {
            match panel.export(&mime).await {
                Ok(ExportOutcome::Open { url }) => js_bridge::open_external(&url),
                Ok(ExportOutcome::Download {
                    file_name,
                    mime,
                    bytes,
                }) => {
                    if let Err(err) = js_bridge::download_bytes(file_name, mime, &bytes) {
                        log::error!("Saving {} failed: {:?}", file_name, err);
                        feedback.set(Some(Feedback::Error(format!(
                            "Could not save {}",
                            file_name
                        ))));
                    }
                }
                Ok(ExportOutcome::Ignored) => {}
                Err(err) => feedback.set(Some(Feedback::Error(err.to_string()))),
            }
            exporting.set(false);
        });
    };

    let opacity_channel = services.channels.opacity.clone();
    let legend = if wms_url().is_some() {
        panel.legend_url().ok()
    } else {
        None
    };
    let layers = services.config.imagery_layers.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px;",
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
            label { "Cloud percentage"
                input {
                    r#type: "number",
                    min: "0",
                    max: "100",
                    value: "{cloud}",
                    oninput: move |evt| cloud.set(evt.value()),
                }
            }
            label { "Layer"
                select {
                    value: "{layer}",
                    onchange: move |evt| layer.set(evt.value()),
                    option { value: "", "Select a layer" }
                    for name in layers {
                        option { key: "{name}", value: "{name}", "{name}" }
                    }
                }
            }
            button { onclick: on_submit, "Submit" }

            {match feedback() {
                Some(Feedback::Success(message)) => rsx! {
                    p { style: "color: #81C784; margin: 0;", "{message}" }
                },
                Some(Feedback::Error(message)) => rsx! {
                    ErrorDisplay { message }
                },
                None => rsx! {},
            }}

            if wms_url().is_some() {
                label { "Opacity"
                    input {
                        r#type: "range",
                        min: "0",
                        max: "1",
                        step: "0.05",
                        value: "{opacity}",
                        oninput: move |evt| {
                            if let Ok(value) = evt.value().parse::<f64>() {
                                opacity_channel.set(value);
                            }
                        },
                    }
                }
                if let Some(src) = legend {
                    img { src: "{src}", alt: "Legend", style: "max-width: 100%;" }
                }
                div {
                    style: "display: flex; gap: 8px;",
                    select {
                        value: "{export_format}",
                        onchange: move |evt| export_format.set(evt.value()),
                        for fmt in ExportFormat::ALL {
                            option { key: "{fmt.mime()}", value: fmt.mime(), "{fmt.mime()}" }
                        }
                    }
                    button {
                        disabled: exporting(),
                        onclick: on_export,
                        if exporting() { "Exporting..." } else { "Export" }
                    }
                }
            }
        }
    }
}
