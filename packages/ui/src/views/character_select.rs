use api::{user_load_context, CharacterManager};
use dioxus::prelude::*;
use store::{Character, ClientConfig, DiscordUser, Server};

use crate::client::{settle_character, use_scoped_api};
use crate::display::{Loading, ServerBadge, UserBadge};
use crate::error_handler::use_error_sink;

/// Create a new character on a server, or claim one nobody plays.
#[component]
pub fn CharacterSelectView(server_id: String, on_open_character: EventHandler<i64>) -> Element {
    let api = use_scoped_api();
    let errors = use_error_sink();
    let config = use_context::<ClientConfig>();
    let mut server = use_signal(|| Option::<Server>::None);
    let mut user = use_signal(|| Option::<DiscordUser>::None);
    let mut unclaimed = use_signal(|| Option::<Vec<Character>>::None);
    let mut name = use_signal(String::new);

    let _loader = use_resource({
        let api = api.clone();
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
                match api.unclaimed_characters(&server_id).await {
                    Ok(loaded) => unclaimed.set(Some(loaded)),
                    Err(err) => errors.fail(&err, "Failed to load characters"),
                }
            }
        }
    });

    let manager = CharacterManager::new(api);

    let create = use_callback({
        let manager = manager.clone();
        let server_id = server_id.clone();
        move |edition: Option<String>| {
            let character_name = name();
            let manager = manager.clone();
            let server_id = server_id.clone();
            spawn(async move {
                let outcome = match &edition {
                    Some(edition) => {
                        manager
                            .create_from_template(edition, &server_id, &character_name)
                            .await
                    }
                    None => manager.create(&server_id, &character_name).await,
                };
                if let Some(character) = settle_character(outcome, errors) {
                    on_open_character.call(character.id);
                }
            });
        }
    });

    let claim = use_callback(move |id: i64| {
        let manager = manager.clone();
        spawn(async move {
            if let Some(character) = settle_character(manager.claim(id).await, errors) {
                on_open_character.call(character.id);
            }
        });
    });

    let (Some(server), Some(user), Some(unclaimed)) = (server(), user(), unclaimed()) else {
        return rsx! { Loading {} };
    };
    let editions = config.characters.template_editions.clone();

    rsx! {
        div {
            class: "flex flex-col gap-4",
            div {
                class: "flex flex-col gap-1",
                ServerBadge { server, prefix: true }
                UserBadge { user, prefix: true }
            }

            section {
                h3 { class: "m-0 mb-2 text-lg font-semibold", "New character" }
                div {
                    class: "flex flex-wrap gap-2",
                    input {
                        class: "flex-1 min-w-48 bg-white border border-neutral-300 rounded px-2 py-1 text-sm outline-none focus:border-primary-500",
                        r#type: "text",
                        placeholder: "Character name",
                        value: name(),
                        oninput: move |evt: FormEvent| name.set(evt.value()),
                    }
                    button {
                        class: "px-3 py-1 rounded bg-neutral-800 text-white text-sm",
                        onclick: move |_| create.call(None),
                        "Create"
                    }
                    for edition in editions {
                        button {
                            key: "{edition}",
                            class: "px-3 py-1 rounded border border-neutral-300 text-sm",
                            onclick: {
                                let edition = edition.clone();
                                move |_| create.call(Some(edition.clone()))
                            },
                            "Create {edition} template"
                        }
                    }
                }
            }

            section {
                h3 { class: "m-0 mb-2 text-lg font-semibold", "Unclaimed characters" }
                if unclaimed.is_empty() {
                    p { class: "m-0 text-sm text-neutral-500", "Every character on this server has a player." }
                }
                ul {
                    class: "m-0 p-0 list-none flex flex-col gap-1",
                    for character in unclaimed {
                        li {
                            key: "{character.id}",
                            class: "flex items-center gap-2",
                            span { "{character.name}" }
                            button {
                                class: "px-2 py-1 rounded border border-neutral-300 text-xs",
                                onclick: move |_| claim.call(character.id),
                                "Claim"
                            }
                        }
                    }
                }
            }
        }
    }
}
