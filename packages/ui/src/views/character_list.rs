use api::{user_load_context, Owner};
use dioxus::prelude::*;
use store::{Category, Character, DiscordUser, Server};

use crate::client::use_scoped_api;
use crate::display::{Loading, ServerBadge, UserBadge};
use crate::error_handler::{use_error_sink, ErrorHandler};
use crate::record_group::CategoryGroup;

/// Every character on a server, with the server's shared constants.
#[component]
pub fn CharacterListView(
    server_id: String,
    on_open_character: EventHandler<i64>,
    on_select: EventHandler<String>,
) -> Element {
    let api = use_scoped_api();
    let errors = use_error_sink();
    let mut server = use_signal(|| Option::<Server>::None);
    let mut user = use_signal(|| Option::<DiscordUser>::None);
    let mut characters = use_signal(|| Option::<Vec<Character>>::None);

    let _loader = use_resource({
        let server_id = server_id.clone();
        move || {
            let api = api.clone();
            let server_id = server_id.clone();
            async move {
                match api.server(&server_id).await {
                    Ok(loaded) => server.set(Some(loaded)),
                    Err(err) => return errors.fail(&err, "Failed to load server"),
                }
                match api.current_user(Some(&server_id)).await {
                    Ok(loaded) => user.set(Some(loaded)),
                    Err(err) => return errors.fail(&err, user_load_context(&err)),
                }
                match api.server_characters(&server_id).await {
                    Ok(loaded) => characters.set(Some(loaded)),
                    Err(err) => errors.fail(&err, "Failed to load characters"),
                }
            }
        }
    });

    let (Some(server), Some(user), Some(characters)) = (server(), user(), characters()) else {
        return rsx! { Loading {} };
    };

    rsx! {
        div {
            class: "flex flex-col gap-4",
            div {
                class: "flex flex-col gap-1",
                ServerBadge { server, prefix: true }
                UserBadge { user, prefix: true }
            }

            section {
                h3 { class: "m-0 mb-2 text-lg font-semibold", "Characters" }
                if characters.is_empty() {
                    p { class: "m-0 text-sm text-neutral-500", "No characters on this server yet." }
                }
                ul {
                    class: "m-0 p-0 list-none flex flex-col gap-1",
                    for character in characters {
                        CharacterRow {
                            key: "{character.id}",
                            character,
                            server_id: server_id.clone(),
                            on_open: on_open_character,
                        }
                    }
                }
                button {
                    class: "mt-3 px-3 py-1.5 rounded bg-neutral-800 text-white text-sm",
                    onclick: {
                        let server_id = server_id.clone();
                        move |_| on_select.call(server_id.clone())
                    },
                    "Create or claim a character"
                }
            }

            ErrorHandler {
                CategoryGroup {
                    category: Category::Constants,
                    owner: Owner::Server(server_id.clone()),
                    read_only: false,
                }
            }
        }
    }
}

/// A character's name followed by who plays it: nobody, the DM, or a user.
#[component]
fn CharacterRow(character: Character, server_id: String, on_open: EventHandler<i64>) -> Element {
    let api = use_scoped_api();
    let errors = use_error_sink();
    let mut owner = use_signal(|| Option::<DiscordUser>::None);

    let owner_id = character.owner_id().map(str::to_string);
    let _loader = use_resource(move || {
        let api = api.clone();
        let owner_id = owner_id.clone();
        let server_id = server_id.clone();
        async move {
            let Some(owner_id) = owner_id else {
                return;
            };
            match api.user(&owner_id, &server_id).await {
                Ok(user) => owner.set(Some(user)),
                Err(err) => errors.fail(&err, "Failed to load user"),
            }
        }
    });

    let id = character.id;
    rsx! {
        li {
            button {
                class: "text-left hover:underline",
                onclick: move |_| on_open.call(id),
                "{character.name}"
            }
            if character.is_dm() {
                span { ": DM" }
            } else if let Some(user) = owner() {
                span { ": " UserBadge { user } }
            }
        }
    }
}
