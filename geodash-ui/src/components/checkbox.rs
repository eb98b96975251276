use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct CheckboxProps {
    pub label: String,
    /// Passed back through `on_toggle`
    pub value: String,
    pub checked: bool,
    pub on_toggle: EventHandler<String>,
}

/// Labelled checkbox that reports its `value` when toggled.
#[component]
pub fn Checkbox(props: CheckboxProps) -> Element {
    let value = props.value.clone();
    let on_toggle = props.on_toggle;

    rsx! {
        label {
            style: "display: flex; align-items: center; gap: 6px; margin: 2px 0; cursor: pointer;",
            input {
                r#type: "checkbox",
                checked: props.checked,
                onchange: move |_| on_toggle.call(value.clone()),
            }
            "{props.label}"
        }
    }
}
