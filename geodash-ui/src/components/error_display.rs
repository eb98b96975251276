//! Error display component.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    #[props(default = "Error".to_string())]
    pub title: String,
}

/// Displays an error or warning in a styled box. Line breaks in `message`
/// are kept, so validation bullet lists render as lists.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        div {
            style: "padding: 12px 16px; margin: 8px 0; background: #FFEBEE; color: #C62828; border-radius: 4px; border: 1px solid #EF9A9A; white-space: pre-line;",
            strong { "{props.title}: " }
            "{props.message}"
        }
    }
}
