//! REST endpoints under `/police/v1`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use geojson::FeatureCollection;
use police_map_shared::geometry::{haversine_m, BoundingBox, LatLng};
use police_map_shared::models::{collection, Station, StationId, StationType};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::assets::Assets;
use crate::storage::{Storage, StorageError};

/// Radius used by `/radius` when the request does not name one.
pub const DEFAULT_RADIUS_M: f64 = 5000.0;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub assets: Arc<Assets>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("station not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(e) => {
                error!(error = %e, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/bounds", get(by_bounds))
        .route("/radius", get(by_radius))
        .route("/type", get(by_type))
        .route("/details", get(details))
        .route("/types", get(types))
        .with_state(state)
}

fn features<'a>(stations: impl Iterator<Item = &'a Station>) -> FeatureCollection {
    collection(stations.map(Station::to_feature).collect())
}

async fn by_bounds(
    State(state): State<AppState>,
    Query(bounds): Query<BoundingBox>,
) -> ApiResult<Json<FeatureCollection>> {
    let stations = state.storage.all_stations()?;
    let hits = stations
        .iter()
        .filter(|s| s.position().is_some_and(|p| bounds.contains(p)));
    Ok(Json(features(hits)))
}

#[derive(Debug, Deserialize)]
struct RadiusParams {
    lat: f64,
    lng: f64,
    radius: Option<f64>,
}

async fn by_radius(
    State(state): State<AppState>,
    Query(params): Query<RadiusParams>,
) -> ApiResult<Json<FeatureCollection>> {
    let center = LatLng::new(params.lat, params.lng);
    let radius = params.radius.unwrap_or(DEFAULT_RADIUS_M);
    if !(radius.is_finite() && radius > 0.0) {
        return Err(ApiError::BadRequest("radius must be a positive number of meters"));
    }
    let stations = state.storage.all_stations()?;
    let hits = stations
        .iter()
        .filter(|s| s.position().is_some_and(|p| haversine_m(center, p) <= radius));
    Ok(Json(features(hits)))
}

#[derive(Debug, Deserialize)]
struct TypeParams {
    police_type: String,
}

async fn by_type(
    State(state): State<AppState>,
    Query(params): Query<TypeParams>,
) -> ApiResult<Json<FeatureCollection>> {
    if state.assets.find_type(&params.police_type).is_none() {
        debug!(code = %params.police_type, "unknown station type requested");
    }
    let stations = state.storage.all_stations()?;
    let hits = stations
        .iter()
        .filter(|s| s.police_type.as_deref() == Some(params.police_type.as_str()));
    Ok(Json(features(hits)))
}

#[derive(Debug, Deserialize)]
struct DetailParams {
    station_id: Option<u64>,
    slug: Option<String>,
}

/// `?slug=` answers with an array of zero or one records, `?station_id=`
/// with the record itself.
async fn details(
    State(state): State<AppState>,
    Query(params): Query<DetailParams>,
) -> ApiResult<Response> {
    if let Some(slug) = params.slug.as_deref().filter(|s| !s.is_empty()) {
        let found: Vec<Station> = state.storage.get_station_by_slug(slug)?.into_iter().collect();
        return Ok(Json(found).into_response());
    }
    match params.station_id {
        Some(id) => {
            let station = state
                .storage
                .get_station(StationId(id))?
                .ok_or(ApiError::NotFound)?;
            Ok(Json(station).into_response())
        }
        None => Err(ApiError::BadRequest("either station_id or slug is required")),
    }
}

async fn types(State(state): State<AppState>) -> Json<Vec<StationType>> {
    Json(state.assets.station_types.clone())
}
