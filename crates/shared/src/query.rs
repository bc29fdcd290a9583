use crate::geometry::{BoundingBox, LatLng};
use crate::models::StationId;
use crate::preference::FilterMode;

pub const API_PREFIX: &str = "/police/v1";

/// One backend request the map can make.
#[derive(Debug, Clone, PartialEq)]
pub enum StationQuery {
    Bounds(BoundingBox),
    Radius(LatLng),
    Type(String),
    DetailById(StationId),
    DetailBySlug(String),
    Types,
}

impl StationQuery {
    /// The query a map refresh issues: a saved type filter takes priority
    /// over the viewport bounds.
    pub fn refresh(filter: &FilterMode, bounds: BoundingBox) -> Self {
        match filter {
            FilterMode::Type(code) => StationQuery::Type(code.clone()),
            FilterMode::All => StationQuery::Bounds(bounds),
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            StationQuery::Bounds(_) => "bounds",
            StationQuery::Radius(_) => "radius",
            StationQuery::Type(_) => "type",
            StationQuery::DetailById(_) | StationQuery::DetailBySlug(_) => "details",
            StationQuery::Types => "types",
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            StationQuery::Bounds(b) => vec![
                ("xmin", b.xmin.to_string()),
                ("ymin", b.ymin.to_string()),
                ("xmax", b.xmax.to_string()),
                ("ymax", b.ymax.to_string()),
            ],
            StationQuery::Radius(p) => vec![("lat", p.lat.to_string()), ("lng", p.lng.to_string())],
            StationQuery::Type(code) => vec![("police_type", code.clone())],
            StationQuery::DetailById(id) => vec![("station_id", id.to_string())],
            StationQuery::DetailBySlug(slug) => vec![("slug", slug.clone())],
            StationQuery::Types => vec![],
        }
    }

    /// Path and query string, e.g. `/police/v1/type?police_type=BPOL`.
    pub fn path_and_query(&self) -> String {
        let path = format!("{}/{}", API_PREFIX, self.endpoint());
        let params = self.params();
        if params.is_empty() {
            return path;
        }
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", path, query)
    }

    /// Full URL against the configured API base.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path_and_query())
    }
}
