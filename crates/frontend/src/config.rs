//! Map constants and build-time configuration.

use police_map_shared::geometry::LatLng;

/// Flensburg city centre.
pub const MAP_CENTER: LatLng = LatLng {
    lat: 54.79443515,
    lng: 9.43205485,
};

pub const ZOOM_INITIAL: f64 = 13.0;
pub const ZOOM_LOCATED: f64 = 16.0;
/// Zoom for a single station; clustering stops here as well.
pub const ZOOM_DETAIL: f64 = 19.0;

pub const TILE_URL: &str = "https://tiles.oklabflensburg.de/sgm/{z}/{x}/{y}.png";
pub const TILE_MAX_ZOOM: i32 = 20;
pub const TILE_SIZE: i32 = 256;
pub const TILE_ATTRIBUTION: &str = r#"&copy; <a href="https://www.openstreetmap.org/copyright" target="_blank" rel="dc:rights">OpenStreetMap</a> contributors"#;

pub const MAP_CONTAINER_ID: &str = "map";

pub const GEOLOCATION_TIMEOUT_MS: u32 = 10_000;

/// Base URL of the station API. Set `POLICE_MAP_API_URL` at build time to
/// talk to another host; otherwise the page's own origin is used.
pub fn api_base_url() -> String {
    if let Some(url) = option_env!("POLICE_MAP_API_URL").filter(|u| !u.is_empty()) {
        return url.to_string();
    }
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Address shown in the about panel, from `POLICE_MAP_CONTACT_MAIL`.
pub fn contact_mail() -> Option<&'static str> {
    option_env!("POLICE_MAP_CONTACT_MAIL").filter(|m| !m.is_empty())
}
