use api::StatusKind;
use dioxus::prelude::*;
use store::{Character, DiscordUser, Server};

use crate::client::use_scoped_api;
use crate::display::{Loading, ServerBadge, UserBadge};
use crate::error_handler::use_error_sink;

#[derive(Clone, Debug, PartialEq)]
enum HomeState {
    Loading,
    LoggedOut,
    Ready {
        user: DiscordUser,
        characters: Vec<(Server, Character)>,
        available: Vec<Server>,
    },
}

/// Landing page: the session user's characters, one per server, and the
/// servers where they have none yet.
#[component]
pub fn HomeView(on_open_character: EventHandler<i64>, on_open_server: EventHandler<String>) -> Element {
    let api = use_scoped_api();
    let errors = use_error_sink();
    let mut state = use_signal(|| HomeState::Loading);

    let _loader = use_resource(move || {
        let api = api.clone();
        async move {
            let user = match api.current_user(None).await {
                Ok(user) => user,
                Err(err) if err.is(StatusKind::Unauthorized) => {
                    state.set(HomeState::LoggedOut);
                    return;
                }
                Err(err) => return errors.fail(&err, "Failed to load user"),
            };
            let servers = match api.my_servers().await {
                Ok(servers) => servers,
                Err(err) => return errors.fail(&err, "Failed to load server"),
            };

            let mut characters = Vec::new();
            let mut available = Vec::new();
            for server in servers {
                match api.my_character(&server.id).await {
                    Ok(Some(character)) => characters.push((server, character)),
                    Ok(None) => available.push(server),
                    Err(err) => return errors.fail(&err, "Failed to load character"),
                }
            }
            state.set(HomeState::Ready {
                user,
                characters,
                available,
            });
        }
    });

    match state() {
        HomeState::Loading => rsx! { Loading {} },
        HomeState::LoggedOut => rsx! {
            div {
                class: "flex flex-col items-start gap-3",
                p { class: "m-0 text-neutral-700", "You are not logged in." }
                a {
                    class: "px-3 py-1.5 rounded bg-neutral-800 text-white text-sm no-underline",
                    href: "/login",
                    "Log in with Discord"
                }
            }
        },
        HomeState::Ready {
            user,
            characters,
            available,
        } => rsx! {
            div {
                class: "flex flex-col gap-6",
                p { class: "m-0", "Logged in as " UserBadge { user } }

                section {
                    h3 { class: "m-0 mb-2 text-lg font-semibold", "Characters" }
                    if characters.is_empty() {
                        p { class: "m-0 text-sm text-neutral-500", "You have no characters yet." }
                    }
                    ul {
                        class: "m-0 p-0 list-none flex flex-col gap-1",
                        for (server, character) in characters {
                            li {
                                key: "{character.id}",
                                class: "flex items-center gap-3",
                                button {
                                    class: "text-left hover:underline",
                                    onclick: move |_| on_open_character.call(character.id),
                                    "{character.name} "
                                }
                                ServerBadge { server: server.clone(), prefix: true }
                                button {
                                    class: "text-xs text-neutral-600 hover:underline",
                                    onclick: {
                                        let id = server.id.clone();
                                        move |_| on_open_server.call(id.clone())
                                    },
                                    "View other characters"
                                }
                            }
                        }
                    }
                }

                section {
                    h3 { class: "m-0 mb-2 text-lg font-semibold", "Available servers" }
                    ul {
                        class: "m-0 p-0 list-none flex flex-col gap-1",
                        for server in available {
                            li {
                                key: "{server.id}",
                                button {
                                    class: "text-left hover:underline",
                                    onclick: {
                                        let id = server.id.clone();
                                        move |_| on_open_server.call(id.clone())
                                    },
                                    ServerBadge { server: server.clone() }
                                }
                            }
                        }
                    }
                }
            }
        },
    }
}
