//! Base-layer catalog.
//!
//! `BaseLayer` is the single mapping between the layer picker's keys, the
//! names carried on the base-layer channel and the tile/WMS source the map
//! renders. Unknown keys or names map to `None`; callers ignore them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed background layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseLayer {
    OpenStreetMap,
    Satellite,
    Dark,
    Light,
    Topographic,
    #[serde(rename = "NDVI")]
    Ndvi,
}

/// Where a base layer's imagery comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSource {
    /// `{z}/{x}/{y}` tile template
    Tile {
        url_template: &'static str,
        attribution: &'static str,
    },
    /// WMS-backed tiles with fixed parameters
    Wms {
        endpoint: String,
        layers: &'static str,
        format: &'static str,
        transparent: bool,
        version: &'static str,
        crs: &'static str,
        attribution: &'static str,
    },
}

impl BaseLayer {
    /// Picker order.
    pub const ALL: [BaseLayer; 6] = [
        BaseLayer::Satellite,
        BaseLayer::Ndvi,
        BaseLayer::OpenStreetMap,
        BaseLayer::Dark,
        BaseLayer::Light,
        BaseLayer::Topographic,
    ];

    /// Name carried on the base-layer channel and in the `layer` URL parameter.
    pub fn name(self) -> &'static str {
        match self {
            BaseLayer::OpenStreetMap => "OpenStreetMap",
            BaseLayer::Satellite => "Satellite",
            BaseLayer::Dark => "Dark",
            BaseLayer::Light => "Light",
            BaseLayer::Topographic => "Topographic",
            BaseLayer::Ndvi => "NDVI",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.name() == name)
    }

    /// Key used by the layer picker.
    pub fn picker_key(self) -> &'static str {
        match self {
            BaseLayer::OpenStreetMap => "street",
            BaseLayer::Satellite => "satellite",
            BaseLayer::Dark => "dark",
            BaseLayer::Light => "light",
            BaseLayer::Topographic => "topo",
            BaseLayer::Ndvi => "NDVI",
        }
    }

    pub fn from_picker_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.picker_key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            BaseLayer::OpenStreetMap => "OpenStreetMap",
            BaseLayer::Satellite => "Satellite",
            BaseLayer::Dark => "Dark",
            BaseLayer::Light => "Light",
            BaseLayer::Topographic => "Topographic (OpenTopoMap)",
            BaseLayer::Ndvi => "NDVI",
        }
    }

    pub fn thumbnail_url(self) -> &'static str {
        match self {
            BaseLayer::Satellite => "https://tiles.maps.eox.at/wms?LAYERS=s2cloudless-2020&FORMAT=image/jpeg&STYLES=&SRS=EPSG:4326&TRANSPARENT=FALSE&SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap&BBOX=-20,0,40,50&WIDTH=352&HEIGHT=200",
            BaseLayer::Ndvi => "https://www.researchgate.net/publication/284190560/figure/fig5/AS:668237402501140@1536331620368/Normalized-Difference-Vegetation-Index-NDVI-data-used-in-FEWS-NET-activities-with-a.png",
            BaseLayer::OpenStreetMap => "https://visioterra.org/mapproxy/service?LAYERS=OSM_Official&FORMAT=image/png&STYLES=&SRS=EPSG:4326&TRANSPARENT=FALSE&SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap&BBOX=-20,0,40,50&WIDTH=352&HEIGHT=200",
            BaseLayer::Dark => "https://visioterra.org/mapproxy/service?LAYERS=Dark_VisioTerra&FORMAT=image/png&STYLES=&SRS=EPSG:4326&TRANSPARENT=FALSE&SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap&BBOX=-20,0,40,50&WIDTH=352&HEIGHT=200",
            BaseLayer::Light => "https://visioterra.org/mapproxy/service?LAYERS=OSM_Humanitarian_Official&FORMAT=image/png&STYLES=&SRS=EPSG:4326&TRANSPARENT=FALSE&SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap&BBOX=-20,0,40,50&WIDTH=352&HEIGHT=200",
            BaseLayer::Topographic => "https://cdn6.aptoide.com/imgs/2/2/5/2251e56c36f11188c8ad4835f42e3d91_fgraphic.png",
        }
    }

    /// Tile or WMS source. WMS layers are served from `wms_endpoint`.
    pub fn source(self, wms_endpoint: &str) -> LayerSource {
        match self {
            BaseLayer::OpenStreetMap => LayerSource::Tile {
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "&copy; OpenStreetMap contributors",
            },
            BaseLayer::Satellite => LayerSource::Tile {
                url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                attribution: "Tiles © Esri",
            },
            BaseLayer::Dark => LayerSource::Tile {
                url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
                attribution: "&copy; CARTO",
            },
            BaseLayer::Light => LayerSource::Tile {
                url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
                attribution: "&copy; CARTO",
            },
            BaseLayer::Topographic => LayerSource::Tile {
                url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
                attribution: "&copy; OpenTopoMap contributors",
            },
            BaseLayer::Ndvi => LayerSource::Wms {
                endpoint: wms_endpoint.to_string(),
                layers: "NDVI-L2A",
                format: "image/png",
                transparent: true,
                version: "1.3.0",
                crs: "EPSG:3857",
                attribution: "Copernicus Data Space Ecosystem",
            },
        }
    }
}

impl fmt::Display for BaseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
