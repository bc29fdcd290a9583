use dioxus::prelude::*;
use police_map_shared::detail::{detail_rows, DetailRow};
use police_map_shared::models::Station;

const DEFAULT_IMAGE_ALT: &str = "Notfallkarte für Schleswig-Holstein";

#[component]
pub fn StationDetail(station: Station) -> Element {
    let rows = detail_rows(&station);
    let image_alt = station
        .police_type
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_ALT.to_string());
    let mut image_loaded = use_signal(|| false);

    rsx! {
        div { id: "detailImage",
            if let Some(url) = station.image_url.as_ref().filter(|u| !u.is_empty()) {
                img {
                    src: "{url}",
                    alt: "{image_alt}",
                    class: if *image_loaded.read() { "loaded" } else { "" },
                    onload: move |_| image_loaded.set(true),
                }
                div { class: "image-caption", "Foto © tbd." }
            }
        }
        ul { id: "detailList",
            for row in rows {
                DetailItem { row }
            }
        }
    }
}

#[component]
fn DetailItem(row: DetailRow) -> Element {
    match &row {
        DetailRow::Name(name) => rsx! {
            li { class: "detail-name", strong { "{name}" } }
        },
        DetailRow::Address { street_line, locality } => rsx! {
            li { class: "detail-address", "{street_line}" br {} "{locality}" }
        },
        DetailRow::Email(value) | DetailRow::Website(value) => {
            let heading = row.heading().unwrap_or_default();
            let href = row.href().unwrap_or_default();
            rsx! {
                li { class: "detail-entry",
                    strong { "{heading}" }
                    br {}
                    a { href: "{href}", target: "_blank", rel: "noopener", "{value}" }
                }
            }
        }
        DetailRow::Telephone(value) | DetailRow::Fax(value) => {
            let heading = row.heading().unwrap_or_default();
            rsx! {
                li { class: "detail-entry",
                    strong { "{heading}" }
                    br {}
                    "{value}"
                }
            }
        }
    }
}
