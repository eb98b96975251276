use crate::browser::{BrowserAddressBar, BrowserClipboard};
use crate::js_bridge;
use crate::state::AppState;
use dioxus::prelude::*;
use geodash_state::view_sync::{share_view, COPIED_FEEDBACK_MS};

/// Copies a link to the current view; reads "Copied" for a moment after.
#[component]
pub fn ShareButton() -> Element {
    let mut state = use_context::<AppState>();
    let mut copied = use_signal(|| false);

    let on_click = move |_| {
        spawn(async move {
            match share_view(&BrowserAddressBar, &BrowserClipboard).await {
                Ok(_) => {
                    copied.set(true);
                    js_bridge::sleep_ms(COPIED_FEEDBACK_MS).await;
                    copied.set(false);
                }
                Err(err) => state.notice.set(Some(err.to_string())),
            }
        });
    };

    rsx! {
        button {
            title: "Copy a link to this view",
            style: "padding: 6px 10px; background: #2a2a2a; color: #eee; border: none; border-radius: 4px; cursor: pointer;",
            onclick: on_click,
            if copied() { "Copied" } else { "Share" }
        }
    }
}
