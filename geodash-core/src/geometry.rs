//! Geographic points and bounding boxes.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// South-west / north-east corner pair.
///
/// Always normalized so the south-west corner is less than or equal to the
/// north-east corner on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    south_west: LatLng,
    north_east: LatLng,
}

impl Bounds {
    /// Build bounds from any two opposite corners.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Bounding box of a polygon's vertices. `None` for an empty ring.
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut south_west = *first;
        let mut north_east = *first;
        for point in rest {
            south_west.lat = south_west.lat.min(point.lat);
            south_west.lng = south_west.lng.min(point.lng);
            north_east.lat = north_east.lat.max(point.lat);
            north_east.lng = north_east.lng.max(point.lng);
        }
        Some(Self {
            south_west,
            north_east,
        })
    }

    /// Parse `"swLat,swLng,neLat,neLng"`, the same order the WMS BBOX uses.
    pub fn parse_bbox(value: &str) -> Option<Self> {
        let parts: Vec<f64> = value
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [sw_lat, sw_lng, ne_lat, ne_lng] => Some(Self::from_corners(
                LatLng::new(*sw_lat, *sw_lng),
                LatLng::new(*ne_lat, *ne_lng),
            )),
            _ => None,
        }
    }

    pub fn south_west(&self) -> LatLng {
        self.south_west
    }

    pub fn north_east(&self) -> LatLng {
        self.north_east
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// WMS 1.3.0 EPSG:4326 axis order: `swLat,swLng,neLat,neLng`.
    pub fn bbox_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.south_west.lat, self.south_west.lng, self.north_east.lat, self.north_east.lng
        )
    }

    /// Closed GeoJSON ring reconstructed from the box, counter-clockwise
    /// from the south-west corner, in `[lng, lat]` order.
    pub fn to_geojson_polygon(&self) -> serde_json::Value {
        let sw = self.south_west;
        let ne = self.north_east;
        json!({
            "type": "Polygon",
            "coordinates": [[
                [sw.lng, sw.lat],
                [ne.lng, sw.lat],
                [ne.lng, ne.lat],
                [sw.lng, ne.lat],
                [sw.lng, sw.lat],
            ]],
        })
    }
}
