//! Floating toggle bar for the side panels.

use super::{ImageryPanelView, LayerPickerPanel, ShareButton, StatisticsPanelView};
use crate::state::{AppState, Panel};
use dioxus::prelude::*;

/// One button per panel, plus the share link. Opening a panel closes
/// whichever was open.
#[component]
pub fn OverlayControls() -> Element {
    let mut state = use_context::<AppState>();
    let active = (state.active_panel)();

    rsx! {
        div {
            style: "position: absolute; top: 12px; left: 12px; z-index: 1000; width: 340px; max-height: calc(100vh - 24px); overflow-y: auto; font-family: sans-serif; color: #eee;",
            div {
                style: "display: flex; gap: 4px; margin-bottom: 6px;",
                for panel in Panel::ALL {
                    button {
                        key: "{panel.title()}",
                        style: if active == Some(panel) {
                            "flex: 1; padding: 6px; background: #4FC3F7; color: #111; border: none; border-radius: 4px; cursor: pointer;"
                        } else {
                            "flex: 1; padding: 6px; background: #2a2a2a; color: #eee; border: none; border-radius: 4px; cursor: pointer;"
                        },
                        onclick: move |_| {
                            let current = *state.active_panel.peek();
                            state.active_panel.set(Panel::toggle(current, panel));
                        },
                        "{panel.title()}"
                    }
                }
                ShareButton {}
            }
            if let Some(panel) = active {
                div {
                    style: "background: rgba(30, 30, 30, 0.92); padding: 12px; border-radius: 6px;",
                    h3 { style: "margin: 0 0 8px 0; font-size: 15px;", "{panel.title()}" }
                    if panel == Panel::Layers {
                        LayerPickerPanel {}
                    }
                    if panel == Panel::Imagery {
                        ImageryPanelView {}
                    }
                    if panel == Panel::Statistics {
                        StatisticsPanelView {}
                    }
                }
            }
        }
    }
}
