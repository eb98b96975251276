//! Shareable view state encoded in the page query string.
//!
//! `?lat=<lat>&lng=<lng>&z=<zoom>&layer=<base layer name>`

use crate::geometry::LatLng;
use crate::layers::BaseLayer;
use serde::{Deserialize, Serialize};

/// Map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

/// Everything mirrored into the address bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub viewport: Viewport,
    pub layer: BaseLayer,
}

impl ViewState {
    pub fn to_query(&self) -> String {
        format!(
            "?lat={:.5}&lng={:.5}&z={}&layer={}",
            self.viewport.center.lat,
            self.viewport.center.lng,
            self.viewport.zoom,
            self.layer.name()
        )
    }

    /// Read a query string, keeping each part of `fallback` that the query
    /// does not validly override. Center needs both `lat` and `lng`.
    pub fn from_query(query: &str, fallback: &ViewState) -> ViewState {
        let mut lat = None;
        let mut lng = None;
        let mut zoom = None;
        let mut layer = None;

        let query = query.trim_start_matches('?');
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "lat" => lat = value.parse::<f64>().ok(),
                "lng" => lng = value.parse::<f64>().ok(),
                "z" => zoom = value.parse::<f64>().ok().filter(|z| z.is_finite() && *z >= 0.0),
                "layer" => layer = BaseLayer::from_name(value),
                _ => {}
            }
        }

        let center = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)).filter(LatLng::is_valid),
            _ => None,
        };

        ViewState {
            viewport: Viewport {
                center: center.unwrap_or(fallback.viewport.center),
                zoom: zoom.unwrap_or(fallback.viewport.zoom),
            },
            layer: layer.unwrap_or(fallback.layer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> ViewState {
        ViewState {
            viewport: Viewport {
                center: LatLng::new(31.76299759769429, 9.7998046875),
                zoom: 5.0,
            },
            layer: BaseLayer::Satellite,
        }
    }

    #[test]
    fn query_round_trips() {
        let view = ViewState {
            viewport: Viewport {
                center: LatLng::new(36.80649, 10.18153),
                zoom: 11.0,
            },
            layer: BaseLayer::Dark,
        };
        let query = view.to_query();
        assert_eq!(query, "?lat=36.80649&lng=10.18153&z=11&layer=Dark");
        assert_eq!(ViewState::from_query(&query, &fallback()), view);
    }

    #[test]
    fn empty_query_uses_fallback() {
        assert_eq!(ViewState::from_query("", &fallback()), fallback());
        assert_eq!(ViewState::from_query("?", &fallback()), fallback());
    }

    #[test]
    fn invalid_parts_fall_back_individually() {
        let view = ViewState::from_query("?lat=abc&lng=10&z=7&layer=Watercolor", &fallback());
        assert_eq!(view.viewport.center, fallback().viewport.center);
        assert_eq!(view.viewport.zoom, 7.0);
        assert_eq!(view.layer, BaseLayer::Satellite);

        let view = ViewState::from_query("lat=95&lng=10&z=-1&layer=Topographic", &fallback());
        assert_eq!(view.viewport.center, fallback().viewport.center);
        assert_eq!(view.viewport.zoom, 5.0);
        assert_eq!(view.layer, BaseLayer::Topographic);
    }

    #[test]
    fn center_needs_both_coordinates() {
        let view = ViewState::from_query("?lat=40.0&z=3", &fallback());
        assert_eq!(view.viewport.center, fallback().viewport.center);
        assert_eq!(view.viewport.zoom, 3.0);
    }
}
