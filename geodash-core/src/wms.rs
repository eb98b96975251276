//! WMS GetMap / GetLegendGraphic URL construction.
//!
//! Values are written as-is (no percent-encoding) so that BBOX keeps its
//! literal commas and FORMAT its slash, matching what the imagery service
//! expects and what the overlay URL on the WMS channel looks like.

use crate::dates::format_wms_time;
use crate::geometry::Bounds;
use crate::ogc::ImageryQuery;
use std::fmt;

pub const WMS_VERSION: &str = "1.3.0";
pub const OVERLAY_CRS: &str = "EPSG:4326";
pub const DEFAULT_FORMAT: &str = "image/png";
pub const DEFAULT_IMAGE_SIZE: u32 = 2500;

/// Parameters that describe the map extent; dropped from legend requests.
const EXTENT_PARAMS: [&str; 4] = ["BBOX", "CRS", "WIDTH", "HEIGHT"];

/// A GetMap request for one imagery query over one region.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMap<'a> {
    query: &'a ImageryQuery,
    bounds: Bounds,
    width: u32,
    height: u32,
    format: &'a str,
}

impl<'a> GetMap<'a> {
    pub fn new(query: &'a ImageryQuery, bounds: Bounds) -> Self {
        Self {
            query,
            bounds,
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
            format: DEFAULT_FORMAT,
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn format(mut self, format: &'a str) -> Self {
        self.format = format;
        self
    }

    pub fn url(&self, endpoint: &str) -> String {
        let mut url = WmsUrl::new(endpoint);
        url.set("SERVICE", "WMS");
        url.set("VERSION", WMS_VERSION);
        url.set("REQUEST", "GetMap");
        url.set("LAYERS", &self.query.layer);
        url.set("BBOX", &self.bounds.bbox_param());
        url.set("CRS", OVERLAY_CRS);
        url.set("WIDTH", &self.width.to_string());
        url.set("HEIGHT", &self.height.to_string());
        url.set("FORMAT", self.format);
        url.set("TIME", &format_wms_time(&self.query.start));
        url.set("MAXCC", &self.query.cloud_percentage.to_string());
        url.to_string()
    }
}

/// A WMS URL split into its endpoint and ordered `KEY=value` pairs.
///
/// Keys are matched case-insensitively; the original key spelling and
/// parameter order are preserved when written back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsUrl {
    endpoint: String,
    params: Vec<(String, String)>,
}

impl WmsUrl {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            params: Vec::new(),
        }
    }

    pub fn parse(url: &str) -> Self {
        let (endpoint, query) = url.split_once('?').unwrap_or((url, ""));
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();
        Self {
            endpoint: endpoint.to_string(),
            params,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first occurrence in place (dropping any duplicates) or
    /// append when absent.
    pub fn set(&mut self, key: &str, value: &str) {
        match self
            .params
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some(index) => {
                self.params[index].1 = value.to_string();
                let mut seen = 0usize;
                self.params.retain(|(k, _)| {
                    if k.eq_ignore_ascii_case(key) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
    }
}

impl fmt::Display for WmsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)?;
        for (index, (key, value)) in self.params.iter().enumerate() {
            let sep = if index == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// Swap the output format of an existing request URL.
pub fn substitute_format(url: &str, format: &str) -> String {
    let mut url = WmsUrl::parse(url);
    url.set("FORMAT", format);
    url.to_string()
}

/// Legend request for the layer of an existing GetMap URL.
pub fn legend_url(url: &str) -> String {
    let mut url = WmsUrl::parse(url);
    url.set("REQUEST", "GetLegendGraphic");
    for key in EXTENT_PARAMS {
        url.remove(key);
    }
    url.to_string()
}
