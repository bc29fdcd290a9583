use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::oneshot;
use police_map_shared::geometry::LatLng;
use thiserror::Error;
use tracing::error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Position as GeolocationPosition, PositionError as GeolocationPositionError, PositionOptions,
};

use crate::config::GEOLOCATION_TIMEOUT_MS;
use crate::controller::{Controller, ExplorerEvent};
use crate::dom;

const PERMISSION_DENIED: u16 = 1;
const TIMEOUT: u16 = 3;

/// Why no position could be obtained. The messages are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationFailure {
    #[error("Standortfreigabe wurde verweigert. Bitte erlauben Sie den Zugriff auf Ihren Standort in den Browsereinstellungen, um diese Funktion zu nutzen.")]
    PermissionDenied,
    #[error("Zeitüberschreitung bei der Standortabfrage. Bitte versuchen Sie es erneut.")]
    Timeout,
    #[error("Standortbestimmung fehlgeschlagen. Bitte versuchen Sie es später erneut.")]
    Unavailable,
    #[error("Ihr Browser unterstützt keine Standortbestimmung.")]
    Unsupported,
}

impl GeolocationFailure {
    pub fn from_code(code: u16) -> Self {
        match code {
            PERMISSION_DENIED => GeolocationFailure::PermissionDenied,
            TIMEOUT => GeolocationFailure::Timeout,
            _ => GeolocationFailure::Unavailable,
        }
    }
}

pub type PositionResult = Result<LatLng, GeolocationFailure>;

/// One high-accuracy position fix, never served from cache.
pub async fn current_position() -> PositionResult {
    let geolocation = web_sys::window()
        .and_then(|w| w.navigator().geolocation().ok())
        .ok_or(GeolocationFailure::Unsupported)?;

    let (tx, rx) = oneshot::channel::<PositionResult>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let resolve = move |result: PositionResult| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(result);
        }
    };

    let on_success = {
        let resolve = resolve.clone();
        Closure::<dyn FnMut(GeolocationPosition)>::new(move |position: GeolocationPosition| {
            let coords = position.coords();
            resolve(Ok(LatLng::new(coords.latitude(), coords.longitude())));
        })
    };
    let on_error = Closure::<dyn FnMut(GeolocationPositionError)>::new(
        move |err: GeolocationPositionError| {
            error!(code = err.code(), reason = %err.message(), "error obtaining geolocation");
            resolve(Err(GeolocationFailure::from_code(err.code())));
        },
    );

    let options = PositionOptions::new();
    options.set_enable_high_accuracy(true);
    options.set_timeout(GEOLOCATION_TIMEOUT_MS);
    options.set_maximum_age(0);

    if let Err(e) = geolocation.get_current_position_with_error_callback_and_options(
        on_success.as_ref().unchecked_ref(),
        Some(on_error.as_ref().unchecked_ref()),
        &options,
    ) {
        error!(error = ?e, "geolocation request rejected");
        return Err(GeolocationFailure::Unavailable);
    }

    // The callbacks must outlive the request.
    let result = rx.await.unwrap_or(Err(GeolocationFailure::Unavailable));
    drop((on_success, on_error));
    result
}

/// A position becomes an event for the controller; a failure is left for
/// the user and fetches nothing.
pub fn located_event(result: PositionResult) -> Result<ExplorerEvent, GeolocationFailure> {
    result.map(ExplorerEvent::Located)
}

/// "Mein Standort" checkbox. Checking it centres the map on the user's
/// position and loads the stations around it.
#[component]
pub fn LocateControl() -> Element {
    let controller = use_context::<Controller>();
    let mut checked = use_signal(|| false);

    rsx! {
        div { class: "control-panel locate-control",
            input {
                r#type: "checkbox",
                id: "myLocation",
                checked: *checked.read(),
                onchange: move |evt: Event<FormData>| {
                    let on = evt.checked();
                    checked.set(on);
                    if !on {
                        return;
                    }
                    let controller = controller.clone();
                    spawn(async move {
                        match located_event(current_position().await) {
                            Ok(event) => controller.send(event),
                            Err(failure) => {
                                checked.set(false);
                                dom::alert(&failure.to_string());
                            }
                        }
                    });
                },
            }
            label { r#for: "myLocation", "Mein Standort" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_from_position_error_code() {
        assert_eq!(GeolocationFailure::from_code(1), GeolocationFailure::PermissionDenied);
        assert_eq!(GeolocationFailure::from_code(2), GeolocationFailure::Unavailable);
        assert_eq!(GeolocationFailure::from_code(3), GeolocationFailure::Timeout);
    }

    #[test]
    fn test_failure_messages_are_distinct() {
        let messages: Vec<String> = [
            GeolocationFailure::PermissionDenied,
            GeolocationFailure::Timeout,
            GeolocationFailure::Unavailable,
            GeolocationFailure::Unsupported,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(messages[0].starts_with("Standortfreigabe wurde verweigert"));
    }
}
