use geojson::FeatureCollection;
use police_map_shared::models::{collection, Station, StationId, StationType};
use police_map_shared::query::StationQuery;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, warn};

use crate::config::api_base_url;
use crate::controller::StationSource;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP error, status: {0}")]
    Status(StatusCode),
}

fn ensure_success(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status(status))
    }
}

async fn try_fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let resp = reqwest::get(url).await?;
    ensure_success(resp.status())?;
    Ok(resp.json::<T>().await?)
}

fn or_no_data<T>(url: &str, result: Result<T, FetchError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(url, error = %e, "fetch failed");
            None
        }
    }
}

/// GET `url` and decode the JSON body. Every failure is logged and
/// reported as `None`; callers treat it as "no data".
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Option<T> {
    or_no_data(url, try_fetch_json(url).await)
}

async fn fetch_query<T: DeserializeOwned>(query: &StationQuery) -> Option<T> {
    fetch_json(&query.url(&api_base_url())).await
}

/// Markers for a bounds, radius or type query. No data is an empty collection.
pub async fn fetch_stations(query: &StationQuery) -> FeatureCollection {
    fetch_query(query)
        .await
        .unwrap_or_else(|| collection(Vec::new()))
}

pub async fn fetch_station(id: StationId) -> Option<Station> {
    fetch_query(&StationQuery::DetailById(id)).await
}

pub async fn fetch_station_by_slug(slug: &str) -> Option<Station> {
    let records: Vec<Station> = fetch_query(&StationQuery::DetailBySlug(slug.to_string())).await?;
    first_record(records, slug)
}

pub async fn fetch_station_types() -> Vec<StationType> {
    fetch_query(&StationQuery::Types).await.unwrap_or_default()
}

/// The station API at [`api_base_url`].
pub struct HttpSource;

impl StationSource for HttpSource {
    async fn stations(&self, query: &StationQuery) -> FeatureCollection {
        fetch_stations(query).await
    }

    async fn station(&self, id: StationId) -> Option<Station> {
        fetch_station(id).await
    }

    async fn station_by_slug(&self, slug: &str) -> Option<Station> {
        fetch_station_by_slug(slug).await
    }

    async fn station_types(&self) -> Vec<StationType> {
        fetch_station_types().await
    }
}

fn first_record(records: Vec<Station>, slug: &str) -> Option<Station> {
    let station = records.into_iter().next();
    if station.is_none() {
        warn!(slug, "no station with this slug");
    }
    station
}
