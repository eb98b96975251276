//! Base map picker panel.

use crate::hooks::use_channel;
use crate::state::Services;
use dioxus::prelude::*;
use geodash_core::layers::BaseLayer;
use geodash_state::layer_picker::LayerPicker;

/// Thumbnail grid of the base maps; the active one is highlighted.
#[component]
pub fn LayerPickerPanel() -> Element {
    let services = use_context::<Services>();
    let picker = use_hook(|| LayerPicker::new(&services.channels));
    let active = use_channel(&services.channels.base_layer);
    let active_name = active();

    let on_pick = use_callback(move |key: String| {
        picker.choose(&key);
    });

    rsx! {
        div {
            style: "display: grid; grid-template-columns: 1fr 1fr; gap: 8px;",
            for layer in LayerPicker::entries().iter().copied() {
                LayerCard {
                    key: "{layer.picker_key()}",
                    layer,
                    selected: layer.name() == active_name,
                    on_pick,
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct LayerCardProps {
    layer: BaseLayer,
    selected: bool,
    on_pick: EventHandler<String>,
}

#[component]
fn LayerCard(props: LayerCardProps) -> Element {
    let layer = props.layer;
    let on_pick = props.on_pick;
    let border = if props.selected { "#4FC3F7" } else { "transparent" };

    rsx! {
        button {
            style: "display: flex; flex-direction: column; align-items: center; padding: 4px; background: #2a2a2a; color: #eee; border: 2px solid {border}; border-radius: 4px; cursor: pointer;",
            onclick: move |_| on_pick.call(layer.picker_key().to_string()),
            img {
                src: layer.thumbnail_url(),
                alt: layer.label(),
                style: "width: 100%; height: 64px; object-fit: cover;",
            }
            span { style: "font-size: 12px; margin-top: 4px;", "{layer.label()}" }
        }
    }
}
