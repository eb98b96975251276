//! Dioxus RSX components for the GeoDash dashboard.

mod checkbox;
mod error_display;
mod imagery_panel;
mod layer_picker;
mod map_view;
mod overlay_controls;
mod share_button;
mod statistics_panel;

pub use checkbox::Checkbox;
pub use error_display::ErrorDisplay;
pub use imagery_panel::ImageryPanelView;
pub use layer_picker::LayerPickerPanel;
pub use map_view::MapView;
pub use overlay_controls::OverlayControls;
pub use share_button::ShareButton;
pub use statistics_panel::StatisticsPanelView;
