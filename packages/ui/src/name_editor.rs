use api::{CharacterManager, CharacterOutcome};
use dioxus::prelude::*;
use store::Character;

use crate::client::{settle_character, use_scoped_api};
use crate::error_handler::use_error_sink;

/// Character name heading with inline edit, save and cancel.
#[component]
pub fn NameEditor(character: Character, on_renamed: EventHandler<Character>) -> Element {
    let api = use_scoped_api();
    let errors = use_error_sink();
    let mut draft = use_signal(|| Option::<String>::None);

    if !character.own {
        return rsx! {
            h2 { class: "m-0 text-2xl font-bold text-neutral-800", "{character.name}" }
        };
    }

    let manager = CharacterManager::new(api);
    let current = character.clone();
    let save = move |_| {
        let Some(name) = draft() else {
            return;
        };
        let manager = manager.clone();
        let current = current.clone();
        spawn(async move {
            let outcome = manager.rename(&current, &name).await;
            if outcome == CharacterOutcome::Ignore {
                draft.set(None);
            }
            if let Some(renamed) = settle_character(outcome, errors) {
                draft.set(None);
                on_renamed.call(renamed);
            }
        });
    };

    match draft() {
        None => {
            let name = character.name.clone();
            rsx! {
                div {
                    class: "flex items-center gap-2",
                    h2 { class: "m-0 text-2xl font-bold text-neutral-800", "{character.name}" }
                    button {
                        class: "px-2 py-1 rounded border border-neutral-300 text-xs",
                        onclick: move |_| draft.set(Some(name.clone())),
                        "Edit"
                    }
                }
            }
        }
        Some(value) => rsx! {
            div {
                class: "flex items-center gap-2",
                input {
                    class: "flex-1 text-2xl font-bold border border-neutral-300 rounded px-2 py-1",
                    r#type: "text",
                    value: "{value}",
                    oninput: move |evt: FormEvent| draft.set(Some(evt.value())),
                }
                button {
                    class: "px-2 py-1 rounded bg-neutral-800 text-white text-xs",
                    onclick: save,
                    "Save"
                }
                button {
                    class: "px-2 py-1 rounded border border-neutral-300 text-xs",
                    onclick: move |_| draft.set(None),
                    "Cancel"
                }
            }
        },
    }
}
