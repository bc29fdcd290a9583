use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc;
use police_map_shared::layout::{controls_offset, map_shift_px, SidebarState};
use police_map_shared::models::{Station, StationType};
use police_map_shared::navigation::Screen;
use police_map_shared::preference::FilterMode;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::components::about_panel::AboutPanel;
use crate::components::locate_control::LocateControl;
use crate::components::map_view::MapView;
use crate::components::sidebar::{Sidebar, SIDEBAR_ID};
use crate::components::type_filter::TypeFilter;
use crate::controller::{self, Controller, ExplorerEvent, ExplorerView};
use crate::dom;
use crate::Route;

/// Layout shared by every route, so the map survives navigation. The
/// routes themselves render nothing; the current route is forwarded to
/// the controller as a [`Screen`].
#[component]
pub fn Explorer() -> Element {
    let route = use_route::<Route>();
    let screen = route.screen();

    let detail = use_signal(|| None::<Station>);
    let sidebar = use_signal(SidebarState::default);
    let station_types = use_signal(|| None::<Vec<StationType>>);
    let filter = use_signal(FilterMode::default);
    let viewport_width = use_signal(dom::viewport_width);
    let mut map_shift = use_signal(|| 0.0_f64);
    let navigator = use_navigator();

    let view = ExplorerView {
        detail,
        sidebar,
        station_types,
        filter,
        viewport_width,
    };
    let controller = use_hook(|| {
        let (tx, rx) = mpsc::unbounded();
        let controller = Controller::new(tx);
        spawn(controller::run(rx, controller.clone(), view, navigator));
        controller
    });
    use_context_provider(|| controller.clone());

    // Forward route changes, including the initial one, exactly once each.
    let last_screen = use_hook(|| Rc::new(RefCell::new(None::<Screen>)));
    if last_screen.borrow().as_ref() != Some(&screen) {
        last_screen.replace(Some(screen.clone()));
        controller.send(ExplorerEvent::ScreenChanged(screen.clone()));
    }

    let resize_listener = use_hook({
        let controller = controller.clone();
        move || {
            let listener = Rc::new(Closure::<dyn FnMut()>::new(move || {
                controller.send(ExplorerEvent::Resized);
            }));
            if let Some(window) = web_sys::window() {
                let _ = window.add_event_listener_with_callback(
                    "resize",
                    (*listener).as_ref().unchecked_ref(),
                );
            }
            listener
        }
    });
    use_drop(move || {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                "resize",
                (*resize_listener).as_ref().unchecked_ref(),
            );
        }
    });

    // Move the map up while the bottom sheet is open, then let Leaflet
    // re-measure once the transition is over.
    use_effect({
        let controller = controller.clone();
        move || {
            let state = *sidebar.read();
            let width = *viewport_width.read();
            let sheet_height = dom::html_element(SIDEBAR_ID)
                .map(|el| f64::from(el.offset_height()))
                .unwrap_or(0.0);
            map_shift.set(map_shift_px(width, state, sheet_height));
            controller.send_after_transition(ExplorerEvent::InvalidateSize);
        }
    });

    use_effect(move || {
        if detail.read().is_some() {
            if let Some(el) = dom::html_element(SIDEBAR_ID) {
                el.set_scroll_top(0);
            }
        }
    });

    let title = screen.title();
    let width = *viewport_width.read();

    rsx! {
        document::Title { "{title}" }
        document::Meta { property: "og:title", content: "{title}" }

        div { class: "explorer",
            AboutPanel { hidden: detail.read().is_some() }
            MapView { shift_px: *map_shift.read() }
            div { id: "mapControls", class: "map-controls", style: controls_offset(width).style(),
                TypeFilter { station_types, filter }
                LocateControl {}
            }
            Sidebar { detail, sidebar, viewport_width }
        }
        Outlet::<Route> {}
    }
}
