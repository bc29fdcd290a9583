//! Bindings for the parts of Leaflet and Leaflet.markercluster the map uses.
//!
//! Both libraries are loaded as globals (`L`) from `Dioxus.toml`.

use std::rc::Rc;

use dioxus::prelude::*;
use js_sys::{Array, Function, Object, Reflect};
use police_map_shared::geometry::{BoundingBox, LatLng};
use police_map_shared::models::StationId;
use police_map_shared::registry::{IconState, MarkerHandle};
use tracing::error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config;
use crate::controller::MapSurface;

const MARKER_DEFAULT: Asset = asset!("/assets/marker-default.svg");
const MARKER_SELECTED: Asset = asset!("/assets/marker-selected.svg");

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type Layer;

    pub type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn new_map(container_id: &str, options: &Object) -> LeafletMap;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &LeafletLatLng, zoom: f64);

    #[wasm_bindgen(method, js_name = getBounds)]
    fn get_bounds(this: &LeafletMap) -> LatLngBounds;

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &LeafletMap) -> f64;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &LeafletMap, bounds: &LatLngBounds, options: &Object);

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LeafletMap);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LeafletMap, layer: &Layer);

    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &Function);

    #[wasm_bindgen(js_name = LatLng)]
    pub type LeafletLatLng;

    #[wasm_bindgen(js_namespace = L, js_name = latLng)]
    fn lat_lng(lat: f64, lng: f64) -> LeafletLatLng;

    pub type LatLngBounds;

    #[wasm_bindgen(method, js_name = getWest)]
    fn get_west(this: &LatLngBounds) -> f64;

    #[wasm_bindgen(method, js_name = getSouth)]
    fn get_south(this: &LatLngBounds) -> f64;

    #[wasm_bindgen(method, js_name = getEast)]
    fn get_east(this: &LatLngBounds) -> f64;

    #[wasm_bindgen(method, js_name = getNorth)]
    fn get_north(this: &LatLngBounds) -> f64;

    #[wasm_bindgen(method, js_name = isValid)]
    fn is_valid(this: &LatLngBounds) -> bool;

    #[wasm_bindgen(extends = Layer)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn new_tile_layer(url: &str, options: &Object) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &LeafletMap);

    #[derive(Clone)]
    pub type Icon;

    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    fn new_icon(options: &Object) -> Icon;

    #[wasm_bindgen(extends = Layer)]
    #[derive(Clone)]
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn new_marker(at: &LeafletLatLng, options: &Object) -> Marker;

    #[wasm_bindgen(method, js_name = setIcon)]
    fn set_icon(this: &Marker, icon: &Icon);

    #[wasm_bindgen(method, js_name = bindTooltip)]
    fn bind_tooltip(this: &Marker, content: &str, options: &Object);

    #[wasm_bindgen(method)]
    fn on(this: &Marker, event: &str, handler: &Function);

    #[wasm_bindgen(extends = Layer)]
    pub type MarkerClusterGroup;

    #[wasm_bindgen(js_namespace = L, js_name = markerClusterGroup)]
    fn new_marker_cluster_group(options: &Object) -> MarkerClusterGroup;

    #[wasm_bindgen(method, js_name = addLayers)]
    fn add_layers(this: &MarkerClusterGroup, layers: &Array);

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &MarkerClusterGroup);

    #[wasm_bindgen(method, js_name = getBounds)]
    fn get_bounds(this: &MarkerClusterGroup) -> LatLngBounds;
}

/// Plain JS object from key/value pairs, for Leaflet option bags.
fn options(entries: &[(&str, JsValue)]) -> Object {
    let obj = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj
}

fn pair(a: i32, b: i32) -> JsValue {
    Array::of2(&JsValue::from(a), &JsValue::from(b)).into()
}

fn has_function(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name))
        .map(|f| f.is_function())
        .unwrap_or(false)
}

/// Leaflet and the cluster plugin are both present on the page.
fn leaflet_loaded() -> bool {
    let Ok(leaflet) = Reflect::get(&js_sys::global(), &JsValue::from_str("L")) else {
        return false;
    };
    !leaflet.is_undefined() && has_function(&leaflet, "map") && has_function(&leaflet, "markerClusterGroup")
}

fn to_leaflet(at: LatLng) -> LeafletLatLng {
    lat_lng(at.lat, at.lng)
}

struct MarkerIcons {
    default: Icon,
    selected: Icon,
}

impl MarkerIcons {
    fn new() -> Self {
        let icon = |url: String| {
            new_icon(&options(&[
                ("iconUrl", url.into()),
                ("iconSize", pair(30, 36)),
                ("iconAnchor", pair(15, 36)),
                ("tooltipAnchor", pair(0, -37)),
            ]))
        };
        MarkerIcons {
            default: icon(MARKER_DEFAULT.to_string()),
            selected: icon(MARKER_SELECTED.to_string()),
        }
    }
}

/// A map marker for one station. Owns its click listener.
#[derive(Clone)]
pub struct StationMarker {
    id: StationId,
    marker: Marker,
    icons: Rc<MarkerIcons>,
    _on_click: Rc<Closure<dyn FnMut()>>,
}

impl MarkerHandle for StationMarker {
    fn station_id(&self) -> StationId {
        self.id
    }

    fn is_marker(&self) -> bool {
        has_function(&self.marker, "setIcon")
    }

    fn set_icon(&self, state: IconState) {
        let icon = match state {
            IconState::Default => &self.icons.default,
            IconState::Selected => &self.icons.selected,
        };
        self.marker.set_icon(icon);
    }
}

/// The Leaflet map with its tile layer and the station cluster layer.
pub struct StationMap {
    map: LeafletMap,
    cluster: MarkerClusterGroup,
    icons: Rc<MarkerIcons>,
    _listeners: Vec<Closure<dyn FnMut()>>,
}

impl StationMap {
    /// Create the map inside element `container_id`. `on_move_end` fires
    /// after every pan/zoom, `on_click` on clicks on the map background.
    pub fn create(
        container_id: &str,
        on_move_end: impl FnMut() + 'static,
        on_click: impl FnMut() + 'static,
    ) -> Option<Self> {
        if !leaflet_loaded() {
            error!("Leaflet is not loaded, the map cannot be shown");
            return None;
        }

        let map = new_map(container_id, &options(&[("zoomControl", false.into())]));
        map.set_view(&to_leaflet(config::MAP_CENTER), config::ZOOM_INITIAL);

        new_tile_layer(
            config::TILE_URL,
            &options(&[
                ("maxZoom", config::TILE_MAX_ZOOM.into()),
                ("tileSize", config::TILE_SIZE.into()),
                ("attribution", config::TILE_ATTRIBUTION.into()),
            ]),
        )
        .add_to(&map);

        let cluster = new_marker_cluster_group(&options(&[
            ("zoomToBoundsOnClick", true.into()),
            ("disableClusteringAtZoom", config::ZOOM_DETAIL.into()),
        ]));
        map.add_layer(&cluster);

        let on_move_end = Closure::<dyn FnMut()>::new(on_move_end);
        let on_click = Closure::<dyn FnMut()>::new(on_click);
        map.on("moveend", on_move_end.as_ref().unchecked_ref());
        map.on("click", on_click.as_ref().unchecked_ref());

        Some(StationMap {
            map,
            cluster,
            icons: Rc::new(MarkerIcons::new()),
            _listeners: vec![on_move_end, on_click],
        })
    }
}

impl MapSurface for StationMap {
    type Marker = StationMarker;

    fn bounds(&self) -> BoundingBox {
        let b = self.map.get_bounds();
        BoundingBox {
            xmin: b.get_west(),
            ymin: b.get_south(),
            xmax: b.get_east(),
            ymax: b.get_north(),
        }
    }

    fn zoom(&self) -> f64 {
        self.map.get_zoom()
    }

    fn set_view(&self, center: LatLng, zoom: f64) {
        self.map.set_view(&to_leaflet(center), zoom);
    }

    fn invalidate_size(&self) {
        self.map.invalidate_size();
    }

    fn station_marker(
        &self,
        id: StationId,
        at: LatLng,
        tooltip: &str,
        on_click: impl FnMut() + 'static,
    ) -> StationMarker {
        let marker = new_marker(
            &to_leaflet(at),
            &options(&[("icon", self.icons.default.clone().into())]),
        );
        if !tooltip.is_empty() {
            marker.bind_tooltip(
                tooltip,
                &options(&[("permanent", false.into()), ("direction", "top".into())]),
            );
        }
        let on_click = Closure::<dyn FnMut()>::new(on_click);
        marker.on("click", on_click.as_ref().unchecked_ref());
        StationMarker {
            id,
            marker,
            icons: self.icons.clone(),
            _on_click: Rc::new(on_click),
        }
    }

    fn show_markers(&self, markers: &[StationMarker]) {
        self.cluster.clear_layers();
        let layers: Array = markers.iter().map(|m| &m.marker).collect();
        self.cluster.add_layers(&layers);
    }

    fn fit_to_markers(&self, max_zoom: f64) -> bool {
        let bounds = self.cluster.get_bounds();
        if !bounds.is_valid() {
            return false;
        }
        self.map
            .fit_bounds(&bounds, &options(&[("maxZoom", max_zoom.into())]));
        true
    }
}
