use dioxus::prelude::*;
use police_map_shared::layout::map_transform_style;

use crate::config::MAP_CONTAINER_ID;
use crate::controller::{Controller, ExplorerEvent};

/// Leaflet owns everything inside the inner container, so only the
/// wrapper carries attributes that change.
#[component]
pub fn MapView(shift_px: f64) -> Element {
    let controller = use_context::<Controller>();

    rsx! {
        div { id: "mapWrapper", class: "map-wrapper", style: map_transform_style(shift_px),
            div {
                id: MAP_CONTAINER_ID,
                class: "map",
                onmounted: move |_| controller.send(ExplorerEvent::MapMounted),
            }
        }
    }
}
