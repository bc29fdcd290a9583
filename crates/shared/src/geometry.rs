//! Coordinates, bounding boxes and the small amount of spherical math the
//! map and the backend need.
//!
//! GeoJSON positions are `[lng, lat]`; everything in this crate that is not
//! raw GeoJSON uses the named [`LatLng`] instead.

use geojson::{Geometry, Value};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_008.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// Viewport bounds as west / south / east / north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn contains(&self, p: LatLng) -> bool {
        p.lng >= self.xmin && p.lng <= self.xmax && p.lat >= self.ymin && p.lat <= self.ymax
    }
}

/// Build a GeoJSON point geometry.
pub fn point_geometry(lat: f64, lng: f64) -> Geometry {
    Geometry::new(Value::Point(vec![lng, lat]))
}

fn position(coords: &[f64]) -> Option<LatLng> {
    match coords {
        [lng, lat, ..] => Some(LatLng::new(*lat, *lng)),
        _ => None,
    }
}

/// Vertex average of a linear ring, ignoring the closing vertex.
fn ring_centroid(ring: &[Vec<f64>]) -> Option<LatLng> {
    let vertices = if ring.len() > 1 && ring.first() == ring.last() {
        &ring[..ring.len() - 1]
    } else {
        ring
    };
    let points: Vec<LatLng> = vertices.iter().filter_map(|c| position(c)).collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lng = points.iter().map(|p| p.lng).sum::<f64>() / n;
    Some(LatLng::new(lat, lng))
}

/// Where to put the marker for a station geometry. Points use their
/// coordinates, polygons the centroid of their outer ring.
pub fn marker_position(geometry: &Geometry) -> Option<LatLng> {
    match &geometry.value {
        Value::Point(coords) => position(coords),
        Value::Polygon(rings) => ring_centroid(rings.first()?),
        Value::MultiPolygon(polygons) => ring_centroid(polygons.first()?.first()?),
        _ => None,
    }
}

/// Great-circle distance in meters.
pub fn haversine_m(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
