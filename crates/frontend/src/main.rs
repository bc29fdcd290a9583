mod api;
mod components;
mod config;
mod controller;
mod cookie;
mod dom;
mod leaflet;
mod pages;

use dioxus::prelude::*;
use police_map_shared::navigation::Screen;

use pages::explorer::Explorer;

#[derive(Routable, Clone, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Explorer)]
        #[route("/")]
        Home {},
        #[route("/:slug")]
        Station { slug: String },
}

impl Route {
    fn screen(&self) -> Screen {
        match self {
            Route::Home {} => Screen::Home,
            Route::Station { slug } => Screen::Detail(slug.clone()),
        }
    }
}

// Both routes are handled by the `Explorer` layout.

#[component]
fn Home() -> Element {
    rsx! {}
}

#[component]
#[allow(unused_variables)]
fn Station(slug: String) -> Element {
    rsx! {}
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
