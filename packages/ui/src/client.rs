use api::{Api, CharacterOutcome, HttpTransport, RequestScope};
use dioxus::prelude::*;
use store::Character;

use crate::error_handler::ErrorSink;

/// The API client every view talks through. Provided once by the app root.
pub type ClientApi = Api<HttpTransport>;

pub fn use_api() -> ClientApi {
    use_context::<ClientApi>()
}

/// An API client whose requests are aborted when the calling component
/// unmounts.
pub fn use_scoped_api() -> ClientApi {
    let api = use_api();
    let scope = use_hook(RequestScope::new);
    use_drop({
        let scope = scope.clone();
        move || scope.close()
    });
    use_hook(move || api.scoped(scope))
}

/// Blocking notice for recoverable problems such as name conflicts.
pub fn alert(message: &str) {
    #[cfg(not(target_arch = "wasm32"))]
    tracing::debug!("alert: {message}");
    #[cfg(target_arch = "wasm32")]
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Show the alert or report of a character operation; the changed character
/// comes back on success.
pub(crate) fn settle_character(outcome: CharacterOutcome, errors: ErrorSink) -> Option<Character> {
    match outcome {
        CharacterOutcome::Open(character) => return Some(character),
        CharacterOutcome::Alert(message) => alert(&message),
        CharacterOutcome::Fail(report) => errors.report(report),
        CharacterOutcome::Ignore => {}
    }
    None
}
