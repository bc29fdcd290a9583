use dioxus::prelude::*;
use police_map_shared::layout::{sidebar_classes, SidebarState};
use police_map_shared::models::Station;

use crate::components::station_detail::StationDetail;
use crate::controller::{Controller, ExplorerEvent};

pub const SIDEBAR_ID: &str = "sidebar";

/// Station sidebar: an overlay panel on desktop, a bottom sheet on phones.
#[component]
pub fn Sidebar(
    detail: Signal<Option<Station>>,
    mut sidebar: Signal<SidebarState>,
    viewport_width: Signal<f64>,
) -> Element {
    let controller = use_context::<Controller>();
    let width = *viewport_width.read();
    let classes = sidebar_classes(width, *sidebar.read()).class_list();
    let station = detail.read().clone();

    rsx! {
        div { id: SIDEBAR_ID, class: "sidebar {classes}",
            div {
                id: "sidebar-handle",
                onclick: move |_| {
                    let next = sidebar.peek().toggle_sheet(*viewport_width.peek());
                    sidebar.set(next);
                },
            }
            button {
                id: "sidebarCloseButton",
                "aria-label": "Schließen",
                onclick: move |evt: Event<MouseData>| {
                    evt.prevent_default();
                    controller.send(ExplorerEvent::CloseDetail);
                },
                "×"
            }
            div {
                id: "sidebarContent",
                class: if station.is_none() { "hidden" } else { "" },
                if let Some(station) = station.clone() {
                    StationDetail { key: "{station.id}", station }
                }
            }
        }
    }
}
