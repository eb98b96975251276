use crate::channel::Channel;
use crate::channels::StateChannels;
use geodash_core::layers::BaseLayer;
use log::{info, warn};

/// Base-map picker: turns a picker key into a base-layer channel update.
#[derive(Clone, Debug)]
pub struct LayerPicker {
    base_layer: Channel<String>,
}

impl LayerPicker {
    pub fn new(channels: &StateChannels) -> Self {
        Self {
            base_layer: channels.base_layer.clone(),
        }
    }

    /// Catalog entries in display order.
    pub fn entries() -> &'static [BaseLayer] {
        &BaseLayer::ALL
    }

    /// Publish the layer for `key`; unknown keys are logged and ignored.
    pub fn choose(&self, key: &str) -> Option<BaseLayer> {
        let Some(layer) = BaseLayer::from_picker_key(key) else {
            warn!("Unknown base map key '{}'", key);
            return None;
        };
        info!("Base map picked: {}", layer.label());
        self.base_layer.set(layer.name().to_string());
        Some(layer)
    }

    pub fn selected(&self) -> Option<BaseLayer> {
        BaseLayer::from_name(&self.base_layer.get())
    }
}
