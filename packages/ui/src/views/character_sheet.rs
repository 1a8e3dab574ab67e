use api::{CharacterManager, Owner};
use dioxus::prelude::*;
use store::{Category, Character, DiscordUser, Server};

use crate::client::{settle_character, use_scoped_api};
use crate::display::{Loading, ServerBadge, UserBadge};
use crate::error_handler::{use_error_sink, ErrorHandler};
use crate::loading_button::LoadingButton;
use crate::name_editor::NameEditor;
use crate::record_group::CategoryGroup;

/// Full sheet of one character. Only the owner gets write affordances.
///
/// The server badge leads to that server's character list and the owner's
/// badge leads home.
#[component]
pub fn CharacterSheetView(
    character_id: i64,
    on_unclaimed: EventHandler<String>,
    on_open_server: EventHandler<String>,
    on_open_home: EventHandler<()>,
) -> Element {
    let api = use_scoped_api();
    let errors = use_error_sink();
    let mut character = use_signal(|| Option::<Character>::None);
    let mut server = use_signal(|| Option::<Server>::None);
    let mut user = use_signal(|| Option::<DiscordUser>::None);
    let mut unclaiming = use_signal(|| false);

    let _loader = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move {
                let loaded = match api.character(character_id).await {
                    Ok(loaded) => loaded,
                    Err(err) => return errors.fail(&err, "Failed to load character"),
                };
                match api.server(&loaded.server).await {
                    Ok(found) => server.set(Some(found)),
                    Err(err) => return errors.fail(&err, "Failed to load server"),
                }
                if let Some(owner) = loaded.owner_id() {
                    match api.user(owner, &loaded.server).await {
                        Ok(found) => user.set(Some(found)),
                        Err(err) => return errors.fail(&err, "Failed to load user"),
                    }
                }
                character.set(Some(loaded));
            }
        }
    });

    let manager = CharacterManager::new(api);
    let unclaim = move |_: ()| {
        let manager = manager.clone();
        unclaiming.set(true);
        spawn(async move {
            match settle_character(manager.unclaim(character_id).await, errors) {
                Some(released) => on_unclaimed.call(released.server),
                None => unclaiming.set(false),
            }
        });
    };

    let (Some(current), Some(server)) = (character(), server()) else {
        return rsx! { Loading {} };
    };
    let read_only = !current.own;
    let owner = Owner::Character(current.id);
    let server_id = server.id.clone();

    rsx! {
        div {
            class: "flex flex-col gap-4",
            div {
                class: "flex items-start justify-between gap-4",
                div {
                    class: "flex flex-col gap-1",
                    NameEditor {
                        character: current.clone(),
                        on_renamed: move |renamed: Character| character.set(Some(renamed)),
                    }
                    button {
                        class: "text-left hover:underline",
                        onclick: move |_| on_open_server.call(server_id.clone()),
                        ServerBadge { server, prefix: true }
                    }
                    if current.is_dm() {
                        span { "User: DM" }
                    } else if let Some(user) = user() {
                        button {
                            class: "text-left hover:underline",
                            onclick: move |_| on_open_home.call(()),
                            UserBadge { user, prefix: true }
                        }
                    }
                }
                if current.own {
                    LoadingButton {
                        loading: unclaiming(),
                        onclick: unclaim,
                        "Unclaim"
                    }
                }
            }

            for category in Category::SHEET {
                ErrorHandler {
                    key: "{category:?}",
                    CategoryGroup {
                        category,
                        owner: owner.clone(),
                        read_only,
                    }
                }
            }
        }
    }
}
