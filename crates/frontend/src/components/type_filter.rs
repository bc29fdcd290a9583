use dioxus::prelude::*;
use police_map_shared::models::StationType;
use police_map_shared::preference::FilterMode;

use crate::controller::{Controller, ExplorerEvent};

/// Station type dropdown. Hidden until the type list has been requested.
#[component]
pub fn TypeFilter(
    station_types: Signal<Option<Vec<StationType>>>,
    filter: Signal<FilterMode>,
) -> Element {
    let controller = use_context::<Controller>();
    let Some(types) = station_types.read().clone() else {
        return rsx! {};
    };
    let selected = filter.read().code().to_string();

    rsx! {
        div { id: "policeTypes", class: "control-panel",
            label { r#for: "policeType", "Schulart filtern:" }
            select {
                id: "policeType",
                name: "policeType",
                value: "{selected}",
                onchange: move |evt: Event<FormData>| {
                    controller.send(ExplorerEvent::FilterChanged(evt.value().to_string()));
                },
                option { value: "", selected: selected.is_empty(), "Alle Schularten" }
                for t in types {
                    option {
                        key: "{t.code}",
                        value: "{t.code}",
                        selected: selected == t.code,
                        "{t.name}"
                    }
                }
            }
        }
    }
}
