use dioxus::prelude::*;

use crate::config::contact_mail;

#[component]
pub fn AboutPanel(hidden: bool) -> Element {
    rsx! {
        div { id: "about", class: if hidden { "about hidden" } else { "about" },
            h1 { "Notfallkarte für Schleswig-Holstein" }
            p {
                "Finde Polizeidienststellen in deiner Nähe. Wähle eine Dienststelle auf der Karte aus, "
                "um Adresse und Kontaktdaten zu sehen."
            }
            if let Some(mail) = contact_mail() {
                p {
                    "Fehler gefunden? Schreib uns an "
                    a { href: "mailto:{mail}", "{mail}" }
                    "."
                }
            }
        }
    }
}
