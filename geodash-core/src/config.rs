//! Dashboard configuration.
//!
//! Every field has a compiled default; a JSON file only needs the fields it
//! overrides.

use crate::geometry::LatLng;
use crate::layers::BaseLayer;
use crate::ogc::IMAGERY_LAYERS;
use crate::stats::STATISTICS_LAYERS;
use crate::view_state::{ViewState, Viewport};
use crate::wms::DEFAULT_IMAGE_SIZE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_WMS_ENDPOINT: &str =
    "https://sh.dataspace.copernicus.eu/ogc/wms/2e44e6fc-1f1c-4258-bd09-8a15c317f604";
pub const DEFAULT_STATS_BASE_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// WMS instance used for overlays and WMS-backed base layers
    pub wms_endpoint: String,
    /// Statistics service; reducers are appended as path segments
    pub stats_base_url: String,
    pub default_base_layer: BaseLayer,
    pub default_center: LatLng,
    pub default_zoom: f64,
    pub image_width: u32,
    pub image_height: u32,
    pub imagery_layers: Vec<String>,
    pub statistics_layers: Vec<String>,
    pub default_cloud_percentage: f64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            wms_endpoint: DEFAULT_WMS_ENDPOINT.to_string(),
            stats_base_url: DEFAULT_STATS_BASE_URL.to_string(),
            default_base_layer: BaseLayer::Satellite,
            default_center: LatLng::new(31.76299759769429, 9.7998046875),
            default_zoom: 5.0,
            image_width: DEFAULT_IMAGE_SIZE,
            image_height: DEFAULT_IMAGE_SIZE,
            imagery_layers: IMAGERY_LAYERS.iter().map(|s| s.to_string()).collect(),
            statistics_layers: STATISTICS_LAYERS.iter().map(|s| s.to_string()).collect(),
            default_cloud_percentage: 25.0,
        }
    }
}

impl DashConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: DashConfig = serde_json::from_str(json).context("invalid dashboard config")?;
        if !config.default_center.is_valid() {
            anyhow::bail!(
                "default_center out of range: {},{}",
                config.default_center.lat,
                config.default_center.lng
            );
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// View used when the address bar carries nothing usable.
    pub fn default_view(&self) -> ViewState {
        ViewState {
            viewport: Viewport {
                center: self.default_center,
                zoom: self.default_zoom,
            },
            layer: self.default_base_layer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashConfig::from_json_str(
            r#"{ "stats_base_url": "http://10.0.0.5:5001", "default_base_layer": "NDVI" }"#,
        )
        .unwrap();
        assert_eq!(config.stats_base_url, "http://10.0.0.5:5001");
        assert_eq!(config.default_base_layer, BaseLayer::Ndvi);
        assert_eq!(config.wms_endpoint, DEFAULT_WMS_ENDPOINT);
        assert_eq!(config.image_width, 2500);
        assert_eq!(config.imagery_layers.len(), 4);
    }

    #[test]
    fn rejects_bad_center_and_unknown_layer() {
        assert!(DashConfig::from_json_str(r#"{ "default_center": { "lat": 120.0, "lng": 0.0 } }"#).is_err());
        assert!(DashConfig::from_json_str(r#"{ "default_base_layer": "Watercolor" }"#).is_err());
    }

    #[test]
    fn default_view_uses_default_layer() {
        let view = DashConfig::default().default_view();
        assert_eq!(view.layer, BaseLayer::Satellite);
        assert_eq!(view.viewport.zoom, 5.0);
    }
}
