//! The explorer controller: a single task that owns the map, the marker
//! registry and the navigation state, and handles one event at a time.
//!
//! Leaflet callbacks and DOM listeners never touch that state directly.
//! They only send an [`ExplorerEvent`] into the controller's channel, so
//! fetches complete in the order they were requested.

use dioxus::prelude::*;
use dioxus::router::Navigator;
use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use geojson::FeatureCollection;
use gloo_timers::future::TimeoutFuture;
use police_map_shared::geometry::{marker_position, BoundingBox, LatLng};
use police_map_shared::label::{feature_label, tooltip_label};
use police_map_shared::layout::{SidebarState, SHEET_TRANSITION_MS};
use police_map_shared::models::{collection, Station, StationId, StationType};
use police_map_shared::navigation::{NavEffect, Navigation, Screen};
use police_map_shared::preference::{FilterMode, FILTER_COOKIE};
use police_map_shared::query::StationQuery;
use police_map_shared::registry::{MarkerHandle, MarkerRegistry};
use tracing::{debug, info, warn};

use crate::api::HttpSource;
use crate::config::{MAP_CONTAINER_ID, ZOOM_DETAIL, ZOOM_INITIAL, ZOOM_LOCATED};
use crate::cookie;
use crate::dom;
use crate::leaflet::StationMap;
use crate::Route;

#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerEvent {
    /// The map container is in the DOM.
    MapMounted,
    ScreenChanged(Screen),
    MapMoved,
    MapClicked,
    MarkerClicked(StationId),
    CloseDetail,
    /// The bottom sheet finished sliding out.
    SheetClosed,
    FilterChanged(String),
    Located(LatLng),
    Resized,
    InvalidateSize,
}

/// Cloneable handle the components use to reach the controller.
#[derive(Clone)]
pub struct Controller(UnboundedSender<ExplorerEvent>);

impl Controller {
    pub fn new(sender: UnboundedSender<ExplorerEvent>) -> Self {
        Controller(sender)
    }

    pub fn send(&self, event: ExplorerEvent) {
        if self.0.unbounded_send(event).is_err() {
            warn!("explorer controller has stopped");
        }
    }

    /// Send `event` after the sidebar transition has finished.
    pub fn send_after_transition(&self, event: ExplorerEvent) {
        let controller = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(SHEET_TRANSITION_MS).await;
            controller.send(event);
        });
    }
}

/// The map the controller draws markers on.
pub(crate) trait MapSurface {
    type Marker: MarkerHandle;

    fn bounds(&self) -> BoundingBox;
    fn zoom(&self) -> f64;
    fn set_view(&self, center: LatLng, zoom: f64);
    fn invalidate_size(&self);

    /// A marker with the default icon and a tooltip above it, calling
    /// `on_click` when clicked. Not yet on the map.
    fn station_marker(
        &self,
        id: StationId,
        at: LatLng,
        tooltip: &str,
        on_click: impl FnMut() + 'static,
    ) -> Self::Marker;

    /// Replace the markers shown on the map.
    fn show_markers(&self, markers: &[Self::Marker]);

    /// Fit the view to the shown markers, zooming in no further than
    /// `max_zoom`. Returns false when there is nothing to fit.
    fn fit_to_markers(&self, max_zoom: f64) -> bool;
}

/// Where stations come from. Failures are already reported as "no data".
pub(crate) trait StationSource {
    async fn stations(&self, query: &StationQuery) -> FeatureCollection;
    async fn station(&self, id: StationId) -> Option<Station>;
    async fn station_by_slug(&self, slug: &str) -> Option<Station>;
    async fn station_types(&self) -> Vec<StationType>;
}

/// The page around the map: rendered state, history and cookies.
pub(crate) trait Page {
    fn read_cookie(&self, name: &str) -> Option<String>;
    fn write_cookie(&mut self, name: &str, value: &str);
    fn push_home(&mut self);
    /// Deliver `event` back to the controller once the sidebar transition is over.
    fn after_transition(&self, event: ExplorerEvent);

    /// Re-read the viewport width.
    fn measure_viewport(&mut self);
    fn viewport_width(&self) -> f64;

    fn sidebar(&self) -> SidebarState;
    fn set_sidebar(&mut self, state: SidebarState);
    fn set_detail(&mut self, station: Option<Station>);
    fn set_station_types(&mut self, types: Vec<StationType>);
    fn set_filter(&mut self, filter: FilterMode);
}

/// Signals the controller writes and the components render.
#[derive(Clone, Copy)]
pub struct ExplorerView {
    pub detail: Signal<Option<Station>>,
    pub sidebar: Signal<SidebarState>,
    /// `None` until the type list has been requested.
    pub station_types: Signal<Option<Vec<StationType>>>,
    pub filter: Signal<FilterMode>,
    pub viewport_width: Signal<f64>,
}

struct BrowserPage {
    view: ExplorerView,
    navigator: Navigator,
    controller: Controller,
}

impl Page for BrowserPage {
    fn read_cookie(&self, name: &str) -> Option<String> {
        cookie::read(name)
    }

    fn write_cookie(&mut self, name: &str, value: &str) {
        cookie::write(name, value);
    }

    fn push_home(&mut self) {
        self.navigator.push(Route::Home {});
    }

    fn after_transition(&self, event: ExplorerEvent) {
        self.controller.send_after_transition(event);
    }

    fn measure_viewport(&mut self) {
        self.view.viewport_width.set(dom::viewport_width());
    }

    fn viewport_width(&self) -> f64 {
        *self.view.viewport_width.peek()
    }

    fn sidebar(&self) -> SidebarState {
        *self.view.sidebar.peek()
    }

    fn set_sidebar(&mut self, state: SidebarState) {
        self.view.sidebar.set(state);
    }

    fn set_detail(&mut self, station: Option<Station>) {
        self.view.detail.set(station);
    }

    fn set_station_types(&mut self, types: Vec<StationType>) {
        self.view.station_types.set(Some(types));
    }

    fn set_filter(&mut self, filter: FilterMode) {
        self.view.filter.set(filter);
    }
}

/// Run the controller until the channel closes. Events that arrive before
/// the map container is mounted are replayed once the map exists.
pub async fn run(
    mut events: UnboundedReceiver<ExplorerEvent>,
    controller: Controller,
    view: ExplorerView,
    navigator: Navigator,
) {
    let mut backlog = Vec::new();
    let map = loop {
        match events.next().await {
            Some(ExplorerEvent::MapMounted) => break create_map(&controller),
            Some(event) => backlog.push(event),
            None => return,
        }
    };
    let Some(map) = map else {
        return;
    };

    let page = BrowserPage {
        view,
        navigator,
        controller: controller.clone(),
    };
    let mut state = ExplorerState::new(map, HttpSource, page, controller);
    state.load_types().await;

    for event in backlog {
        state.handle(event).await;
    }
    while let Some(event) = events.next().await {
        state.handle(event).await;
    }
}

fn create_map(controller: &Controller) -> Option<StationMap> {
    let on_move = controller.clone();
    let on_click = controller.clone();
    StationMap::create(
        MAP_CONTAINER_ID,
        move || on_move.send(ExplorerEvent::MapMoved),
        move || on_click.send(ExplorerEvent::MapClicked),
    )
}

struct ExplorerState<M: MapSurface, S, P> {
    map: M,
    source: S,
    page: P,
    registry: MarkerRegistry<M::Marker>,
    /// Set once the view has been fitted to a non-empty marker set.
    bounds_set: bool,
    filter: FilterMode,
    navigation: Navigation,
    controller: Controller,
}

impl<M: MapSurface, S: StationSource, P: Page> ExplorerState<M, S, P> {
    /// The saved type filter is read from the page's cookie.
    fn new(map: M, source: S, page: P, controller: Controller) -> Self {
        let filter = FilterMode::from_saved(page.read_cookie(FILTER_COOKIE).as_deref());
        ExplorerState {
            map,
            source,
            page,
            registry: MarkerRegistry::new(),
            bounds_set: false,
            filter,
            navigation: Navigation::default(),
            controller,
        }
    }

    async fn handle(&mut self, event: ExplorerEvent) {
        debug!(?event, "explorer event");
        match event {
            ExplorerEvent::MapMounted => {}
            ExplorerEvent::ScreenChanged(screen) => self.change_screen(screen).await,
            ExplorerEvent::MapMoved => self.refresh().await,
            ExplorerEvent::MapClicked | ExplorerEvent::CloseDetail => self.clear_detail(),
            ExplorerEvent::MarkerClicked(id) => self.open_station(id).await,
            ExplorerEvent::SheetClosed => {
                let state = self.page.sidebar();
                self.page.set_sidebar(state.finish_closing());
            }
            ExplorerEvent::FilterChanged(value) => self.change_filter(value).await,
            ExplorerEvent::Located(position) => self.show_nearby(position).await,
            ExplorerEvent::Resized => {
                self.page.measure_viewport();
                self.map.invalidate_size();
            }
            ExplorerEvent::InvalidateSize => self.map.invalidate_size(),
        }
    }

    async fn load_types(&mut self) {
        let types = self.source.station_types().await;
        self.page.set_filter(self.filter.clone());
        self.page.set_station_types(types);
    }

    async fn change_screen(&mut self, screen: Screen) {
        match self.navigation.on_screen_change(screen) {
            NavEffect::None => {}
            NavEffect::ShowHome => {
                self.clear_detail();
                self.refresh().await;
            }
            NavEffect::LoadSlug { slug, recenter } => self.load_slug(&slug, recenter).await,
        }
    }

    /// Reload markers for the saved type, or else for the current viewport,
    /// and keep the selected station highlighted.
    async fn refresh(&mut self) {
        let query = StationQuery::refresh(&self.filter, self.map.bounds());
        debug!(zoom = self.map.zoom(), ?query, "refreshing markers");
        let data = self.source.stations(&query).await;
        self.render_collection(&data, ZOOM_INITIAL);
        self.registry.reselect();
    }

    fn render_collection(&mut self, data: &FeatureCollection, fit_zoom: f64) {
        let mut markers = Vec::with_capacity(data.features.len());

        for feature in &data.features {
            let Some(id) = StationId::from_feature(feature) else {
                warn!("feature without station id, skipped");
                continue;
            };
            let Some(position) = feature.geometry.as_ref().and_then(marker_position) else {
                warn!(%id, "feature without usable geometry, skipped");
                continue;
            };
            let tooltip = feature_label(feature).map(tooltip_label).unwrap_or_default();
            let controller = self.controller.clone();
            markers.push(self.map.station_marker(id, position, tooltip, move || {
                controller.send(ExplorerEvent::MarkerClicked(id));
            }));
        }

        self.map.show_markers(&markers);
        self.registry.replace_all(markers);

        if !self.bounds_set && !self.registry.is_empty() {
            self.bounds_set = self.map.fit_to_markers(fit_zoom);
        }
    }

    fn show_detail(&mut self, station: Station) {
        self.page.set_detail(Some(station));
        self.page.set_sidebar(SidebarState::Open);
    }

    /// Close the sidebar, drop the highlight and go back to `/`.
    fn clear_detail(&mut self) {
        self.registry.clear_selection();
        self.page.set_detail(None);

        let next = self.page.sidebar().close(self.page.viewport_width());
        self.page.set_sidebar(next);
        if next == SidebarState::Closing {
            self.page.after_transition(ExplorerEvent::SheetClosed);
        }

        if self.navigation.begin_go_home() {
            self.page.push_home();
        }
    }

    async fn open_station(&mut self, id: StationId) {
        self.clear_detail();
        let Some(station) = self.source.station(id).await else {
            return;
        };
        self.show_detail(station);
        self.registry.select_id(id);
    }

    async fn load_slug(&mut self, slug: &str, recenter: bool) {
        let Some(station) = self.source.station_by_slug(slug).await else {
            return;
        };
        let id = station.id;
        let position = station.position();
        let single = collection(vec![station.to_feature()]);
        self.show_detail(station);
        self.render_collection(&single, ZOOM_DETAIL);

        if !self.registry.select_id(id) {
            info!(%id, "marker not on the map yet, refreshing");
            self.refresh().await;
            self.registry.select_id(id);
        }

        if recenter {
            if let Some(position) = position {
                self.map.set_view(position, ZOOM_DETAIL);
            }
        }
    }

    async fn change_filter(&mut self, value: String) {
        self.page.write_cookie(FILTER_COOKIE, &value);
        self.filter = FilterMode::from_selection(&value);
        self.page.set_filter(self.filter.clone());
        self.refresh().await;
    }

    async fn show_nearby(&mut self, position: LatLng) {
        let data = self.source.stations(&StationQuery::Radius(position)).await;
        self.render_collection(&data, ZOOM_INITIAL);
        self.registry.reselect();
        self.map.set_view(position, ZOOM_LOCATED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use futures_channel::mpsc;
    use police_map_shared::geometry::point_geometry;
    use police_map_shared::registry::IconState;

    use crate::components::locate_control::{located_event, GeolocationFailure};

    #[derive(Clone)]
    struct FakeMarker {
        id: StationId,
        icon: Rc<Cell<IconState>>,
    }

    impl MarkerHandle for FakeMarker {
        fn station_id(&self) -> StationId {
            self.id
        }

        fn is_marker(&self) -> bool {
            true
        }

        fn set_icon(&self, state: IconState) {
            self.icon.set(state);
        }
    }

    struct FakeMap {
        bounds: BoundingBox,
        views: RefCell<Vec<(LatLng, f64)>>,
        shown: RefCell<Vec<StationId>>,
        fits: RefCell<Vec<f64>>,
    }

    impl FakeMap {
        fn new() -> Self {
            FakeMap {
                bounds: BoundingBox {
                    xmin: 9.3,
                    ymin: 54.7,
                    xmax: 9.5,
                    ymax: 54.9,
                },
                views: RefCell::new(Vec::new()),
                shown: RefCell::new(Vec::new()),
                fits: RefCell::new(Vec::new()),
            }
        }
    }

    impl MapSurface for FakeMap {
        type Marker = FakeMarker;

        fn bounds(&self) -> BoundingBox {
            self.bounds
        }

        fn zoom(&self) -> f64 {
            ZOOM_INITIAL
        }

        fn set_view(&self, center: LatLng, zoom: f64) {
            self.views.borrow_mut().push((center, zoom));
        }

        fn invalidate_size(&self) {}

        fn station_marker(
            &self,
            id: StationId,
            _at: LatLng,
            _tooltip: &str,
            _on_click: impl FnMut() + 'static,
        ) -> FakeMarker {
            FakeMarker {
                id,
                icon: Rc::new(Cell::new(IconState::Default)),
            }
        }

        fn show_markers(&self, markers: &[FakeMarker]) {
            *self.shown.borrow_mut() = markers.iter().map(|m| m.id).collect();
        }

        fn fit_to_markers(&self, max_zoom: f64) -> bool {
            if self.shown.borrow().is_empty() {
                return false;
            }
            self.fits.borrow_mut().push(max_zoom);
            true
        }
    }

    struct FakeSource {
        stations: Vec<Station>,
        requests: RefCell<Vec<StationQuery>>,
    }

    impl StationSource for FakeSource {
        async fn stations(&self, query: &StationQuery) -> FeatureCollection {
            self.requests.borrow_mut().push(query.clone());
            let hits = self
                .stations
                .iter()
                .filter(|s| match query {
                    StationQuery::Type(code) => s.police_type.as_deref() == Some(code.as_str()),
                    _ => true,
                })
                .map(Station::to_feature)
                .collect();
            collection(hits)
        }

        async fn station(&self, id: StationId) -> Option<Station> {
            self.requests.borrow_mut().push(StationQuery::DetailById(id));
            self.stations.iter().find(|s| s.id == id).cloned()
        }

        async fn station_by_slug(&self, slug: &str) -> Option<Station> {
            self.requests
                .borrow_mut()
                .push(StationQuery::DetailBySlug(slug.to_string()));
            self.stations.iter().find(|s| s.slug == slug).cloned()
        }

        async fn station_types(&self) -> Vec<StationType> {
            self.requests.borrow_mut().push(StationQuery::Types);
            vec![StationType {
                code: "BPOL".to_string(),
                name: "Bundespolizei".to_string(),
            }]
        }
    }

    #[derive(Default)]
    struct FakePage {
        cookies: HashMap<String, String>,
        pushed_home: usize,
        width: f64,
        sidebar: SidebarState,
        detail: Option<Station>,
        station_types: Option<Vec<StationType>>,
        filter: FilterMode,
    }

    impl Page for FakePage {
        fn read_cookie(&self, name: &str) -> Option<String> {
            self.cookies.get(name).cloned()
        }

        fn write_cookie(&mut self, name: &str, value: &str) {
            self.cookies.insert(name.to_string(), value.to_string());
        }

        fn push_home(&mut self) {
            self.pushed_home += 1;
        }

        fn after_transition(&self, _event: ExplorerEvent) {}

        fn measure_viewport(&mut self) {}

        fn viewport_width(&self) -> f64 {
            self.width
        }

        fn sidebar(&self) -> SidebarState {
            self.sidebar
        }

        fn set_sidebar(&mut self, state: SidebarState) {
            self.sidebar = state;
        }

        fn set_detail(&mut self, station: Option<Station>) {
            self.detail = station;
        }

        fn set_station_types(&mut self, types: Vec<StationType>) {
            self.station_types = Some(types);
        }

        fn set_filter(&mut self, filter: FilterMode) {
            self.filter = filter;
        }
    }

    fn station(id: u64, name: &str, slug: &str, lat: f64, lng: f64, police_type: &str) -> Station {
        Station {
            id: StationId(id),
            name: name.to_string(),
            slug: slug.to_string(),
            street: None,
            house_number: None,
            zipcode: None,
            city: Some("Flensburg".to_string()),
            telephone: None,
            fax: None,
            email: None,
            website: None,
            image_url: None,
            police_type: Some(police_type.to_string()),
            geojson: Some(point_geometry(lat, lng)),
        }
    }

    fn source() -> FakeSource {
        FakeSource {
            stations: vec![
                station(1, "Revier Nord", "revier-nord", 54.80, 9.43, "LPOL"),
                station(3, "West Station", "west-station-3", 54.78, 9.41, "LPOL"),
                station(8, "Bundespolizeiinspektion", "bundespolizeiinspektion", 54.77, 9.44, "BPOL"),
            ],
            requests: RefCell::new(Vec::new()),
        }
    }

    type TestState = ExplorerState<FakeMap, FakeSource, FakePage>;

    async fn started(page: FakePage) -> (TestState, mpsc::UnboundedReceiver<ExplorerEvent>) {
        let (tx, rx) = mpsc::unbounded();
        let mut state = ExplorerState::new(FakeMap::new(), source(), page, Controller::new(tx));
        state.load_types().await;
        (state, rx)
    }

    fn desktop() -> FakePage {
        FakePage {
            width: 1280.0,
            ..Default::default()
        }
    }

    fn requests(state: &TestState) -> Vec<StationQuery> {
        state.source.requests.borrow().clone()
    }

    // --- Initial load ---

    #[tokio::test]
    async fn test_home_load_fetches_viewport_and_registers_markers() {
        let (mut state, _rx) = started(desktop()).await;
        state.handle(ExplorerEvent::ScreenChanged(Screen::Home)).await;

        let bounds = state.map.bounds;
        assert_eq!(
            requests(&state),
            vec![StationQuery::Types, StationQuery::Bounds(bounds)]
        );
        let url = StationQuery::Bounds(bounds).path_and_query();
        for key in ["xmin=9.3", "ymin=54.7", "xmax=9.5", "ymax=54.9"] {
            assert!(url.contains(key), "{} missing in {}", key, url);
        }

        for id in [1, 3, 8] {
            assert!(state.registry.find(StationId(id)).is_some());
        }
        assert_eq!(*state.map.fits.borrow(), vec![ZOOM_INITIAL]);
        // Already home: no history entry
        assert_eq!(state.page.pushed_home, 0);
        assert!(state.page.station_types.is_some());
    }

    #[tokio::test]
    async fn test_deep_link_recenters_and_selects() {
        let (mut state, _rx) = started(desktop()).await;
        state
            .handle(ExplorerEvent::ScreenChanged(Screen::Detail("west-station-3".to_string())))
            .await;

        assert_eq!(
            requests(&state).last(),
            Some(&StationQuery::DetailBySlug("west-station-3".to_string()))
        );
        assert_eq!(*state.map.shown.borrow(), vec![StationId(3)]);
        assert_eq!(state.registry.selected_id(), Some(StationId(3)));
        let marker = state.registry.find(StationId(3)).unwrap();
        assert_eq!(marker.icon.get(), IconState::Selected);

        let (center, zoom) = *state.map.views.borrow().last().unwrap();
        assert_eq!(zoom, ZOOM_DETAIL);
        assert!((center.lat - 54.78).abs() < 1e-9);
        assert!((center.lng - 9.41).abs() < 1e-9);

        assert_eq!(state.page.detail.as_ref().map(|s| s.id), Some(StationId(3)));
        assert_eq!(state.page.sidebar, SidebarState::Open);
    }

    #[tokio::test]
    async fn test_unknown_slug_leaves_map_untouched() {
        let (mut state, _rx) = started(desktop()).await;
        state
            .handle(ExplorerEvent::ScreenChanged(Screen::Detail("nowhere".to_string())))
            .await;
        assert!(state.registry.is_empty());
        assert!(state.map.views.borrow().is_empty());
        assert!(state.page.detail.is_none());
    }

    // --- Selection ---

    #[tokio::test]
    async fn test_marker_click_then_map_click() {
        let (mut state, _rx) = started(desktop()).await;
        state.handle(ExplorerEvent::ScreenChanged(Screen::Home)).await;
        state.handle(ExplorerEvent::MarkerClicked(StationId(8))).await;
        assert_eq!(state.registry.selected_id(), Some(StationId(8)));
        assert_eq!(state.page.sidebar, SidebarState::Open);

        state.handle(ExplorerEvent::MapClicked).await;
        assert_eq!(state.registry.selected_id(), None);
        assert!(state.page.detail.is_none());
        assert_eq!(state.page.sidebar, SidebarState::Closed);
        assert_eq!(state.page.pushed_home, 0);
    }

    #[tokio::test]
    async fn test_closing_detail_from_slug_goes_home() {
        let (mut state, _rx) = started(desktop()).await;
        state
            .handle(ExplorerEvent::ScreenChanged(Screen::Detail("west-station-3".to_string())))
            .await;
        state.handle(ExplorerEvent::CloseDetail).await;
        assert_eq!(state.page.pushed_home, 1);

        // The pushed route comes back as a screen change and is not reloaded.
        let before = requests(&state).len();
        state.handle(ExplorerEvent::ScreenChanged(Screen::Home)).await;
        assert_eq!(requests(&state).len(), before);
    }

    // --- Type filter ---

    #[tokio::test]
    async fn test_type_choice_survives_reload() {
        let (mut state, _rx) = started(desktop()).await;
        state.handle(ExplorerEvent::ScreenChanged(Screen::Home)).await;
        state.handle(ExplorerEvent::FilterChanged("BPOL".to_string())).await;

        assert_eq!(
            state.page.cookies.get(FILTER_COOKIE).map(String::as_str),
            Some("BPOL")
        );
        assert_eq!(
            requests(&state).last(),
            Some(&StationQuery::Type("BPOL".to_string()))
        );
        assert_eq!(*state.map.shown.borrow(), vec![StationId(8)]);

        let reloaded = FakePage {
            cookies: state.page.cookies.clone(),
            ..desktop()
        };
        let (mut state, _rx) = started(reloaded).await;
        assert_eq!(state.page.filter, FilterMode::Type("BPOL".to_string()));
        state.handle(ExplorerEvent::ScreenChanged(Screen::Home)).await;
        assert_eq!(
            requests(&state),
            vec![StationQuery::Types, StationQuery::Type("BPOL".to_string())]
        );
    }

    #[tokio::test]
    async fn test_choosing_all_types_returns_to_viewport() {
        let mut page = desktop();
        page.cookies.insert(FILTER_COOKIE.to_string(), "BPOL".to_string());
        let (mut state, _rx) = started(page).await;
        state.handle(ExplorerEvent::FilterChanged(String::new())).await;

        assert_eq!(state.page.cookies.get(FILTER_COOKIE).map(String::as_str), Some(""));
        let bounds = state.map.bounds;
        assert_eq!(requests(&state).last(), Some(&StationQuery::Bounds(bounds)));
    }

    // --- Geolocation ---

    #[tokio::test]
    async fn test_denied_location_fetches_nothing() {
        let (mut state, _rx) = started(desktop()).await;
        state.handle(ExplorerEvent::ScreenChanged(Screen::Home)).await;
        let before = requests(&state);

        let outcome = located_event(Err(GeolocationFailure::PermissionDenied));
        assert_eq!(outcome, Err(GeolocationFailure::PermissionDenied));
        if let Ok(event) = outcome {
            state.handle(event).await;
        }
        assert_eq!(requests(&state), before);
        assert!(!requests(&state)
            .iter()
            .any(|q| matches!(q, StationQuery::Radius(_))));
    }

    #[tokio::test]
    async fn test_located_fetches_radius_and_zooms_in() {
        let (mut state, _rx) = started(desktop()).await;
        let here = LatLng::new(54.79, 9.42);
        let event = located_event(Ok(here)).unwrap();
        state.handle(event).await;

        assert_eq!(requests(&state).last(), Some(&StationQuery::Radius(here)));
        assert_eq!(state.map.views.borrow().last(), Some(&(here, ZOOM_LOCATED)));
    }

    // --- Layout ---

    #[tokio::test]
    async fn test_mobile_sheet_closes_after_transition() {
        let (mut state, _rx) = started(FakePage {
            width: 400.0,
            ..Default::default()
        })
        .await;
        state.handle(ExplorerEvent::MarkerClicked(StationId(1))).await;
        state.handle(ExplorerEvent::CloseDetail).await;
        assert_eq!(state.page.sidebar, SidebarState::Closing);

        state.handle(ExplorerEvent::SheetClosed).await;
        assert_eq!(state.page.sidebar, SidebarState::Closed);
    }
}
