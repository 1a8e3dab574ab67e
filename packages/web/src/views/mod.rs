//! Route targets. Each wraps a shared view in its own error boundary and
//! turns the view's navigation callbacks into router pushes.

use dioxus::prelude::*;
use ui::views::{CharacterListView, CharacterSelectView, CharacterSheetView, HomeView};
use ui::ErrorHandler;

use crate::Route;

#[component]
pub fn Home() -> Element {
    let nav = use_navigator();
    rsx! {
        ErrorHandler {
            HomeView {
                on_open_character: move |character_id: i64| {
                    nav.push(Route::Character { character_id });
                },
                on_open_server: move |server_id: String| {
                    nav.push(Route::Server { server_id });
                },
            }
        }
    }
}

#[component]
pub fn Server(server_id: String) -> Element {
    let nav = use_navigator();
    rsx! {
        ErrorHandler {
            key: "{server_id}",
            CharacterListView {
                server_id: server_id.clone(),
                on_open_character: move |character_id: i64| {
                    nav.push(Route::Character { character_id });
                },
                on_select: move |server_id: String| {
                    nav.push(Route::Select { server_id });
                },
            }
        }
    }
}

#[component]
pub fn Select(server_id: String) -> Element {
    let nav = use_navigator();
    rsx! {
        ErrorHandler {
            key: "{server_id}",
            CharacterSelectView {
                server_id: server_id.clone(),
                on_open_character: move |character_id: i64| {
                    nav.push(Route::Character { character_id });
                },
            }
        }
    }
}

#[component]
pub fn Character(character_id: i64) -> Element {
    let nav = use_navigator();
    rsx! {
        ErrorHandler {
            key: "{character_id}",
            CharacterSheetView {
                character_id,
                on_unclaimed: move |server_id: String| {
                    nav.push(Route::Select { server_id });
                },
                on_open_server: move |server_id: String| {
                    nav.push(Route::Server { server_id });
                },
                on_open_home: move |_| {
                    nav.push(Route::Home {});
                },
            }
        }
    }
}
