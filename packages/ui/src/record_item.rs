use api::{HttpTransport, Outcome, RecordManager};
use dioxus::prelude::*;
use store::{EditDraft, FieldInput, FormField, RecordList};

use crate::error_handler::use_error_sink;
use crate::loading_button::LoadingButton;
use crate::record_group::settle_into;
use crate::record_view::RecordView;

const ROW: &str = "flex items-start justify-between gap-3 py-2 border-b border-neutral-100 last:border-b-0";
const BUTTON: &str = "px-2 py-1 rounded border border-neutral-300 text-xs text-neutral-700 hover:bg-neutral-100";
const INPUT: &str = "w-full bg-white border border-neutral-300 rounded px-2 py-1 text-sm text-neutral-800 outline-none focus:border-primary-500";

/// One row of a record group: read view, or the edit form while editing.
///
/// The form stays open until the server accepts the change, so a rejected
/// save (name conflict, invalid values) keeps the user's inputs.
#[component]
pub fn RecordItem<R: RecordView>(
    record: R,
    read_only: bool,
    manager: RecordManager<HttpTransport>,
    list: Signal<RecordList<R>>,
) -> Element {
    let errors = use_error_sink();
    let mut draft = use_signal(|| Option::<EditDraft>::None);
    let mut saving = use_signal(|| false);
    let view = record.read();
    let id = record.id();

    if read_only {
        return rsx! {
            li { class: ROW, div { class: "flex-1", {view} } }
        };
    }

    let Some(current) = draft() else {
        let delete_manager = manager.clone();
        return rsx! {
            li {
                class: ROW,
                div { class: "flex-1", {view} }
                div {
                    class: "flex gap-1 shrink-0",
                    button {
                        class: BUTTON,
                        onclick: move |_| draft.set(Some(EditDraft::of(&record))),
                        "Edit"
                    }
                    button {
                        class: BUTTON,
                        onclick: move |_| {
                            let manager = delete_manager.clone();
                            spawn(async move {
                                settle_into(list, errors, manager.delete::<R>(id).await);
                            });
                        },
                        "Delete"
                    }
                }
            }
        };
    };

    let save = move |_: ()| {
        let Some(current) = draft() else {
            return;
        };
        let manager = manager.clone();
        saving.set(true);
        spawn(async move {
            let outcome = manager.update::<R>(&current).await;
            saving.set(false);
            if matches!(outcome, Outcome::Apply(_) | Outcome::Ignore) {
                draft.set(None);
            }
            settle_into(list, errors, outcome);
        });
    };

    rsx! {
        li {
            class: ROW,
            div {
                class: "flex-1 flex flex-col gap-2",
                for field in current.fields().iter().cloned() {
                    FieldEditor { key: "{field.name}", field, draft }
                }
            }
            div {
                class: "flex gap-1 shrink-0",
                LoadingButton {
                    class: BUTTON.to_string(),
                    loading: saving(),
                    onclick: save,
                    "Save"
                }
                button {
                    class: BUTTON,
                    onclick: move |_| draft.set(None),
                    "Cancel"
                }
            }
        }
    }
}

#[component]
fn FieldEditor(field: FormField, draft: Signal<Option<EditDraft>>) -> Element {
    let name = field.name;
    let value = field.value.clone();
    let mut draft = draft;
    let mut update = move |value: String| {
        draft.with_mut(|draft| {
            if let Some(draft) = draft.as_mut() {
                draft.set(name, value);
            }
        });
    };

    let input = match field.input {
        FieldInput::Text => rsx! {
            input {
                class: INPUT,
                r#type: "text",
                value: "{value}",
                oninput: move |evt: FormEvent| update(evt.value()),
            }
        },
        FieldInput::Number => rsx! {
            input {
                class: INPUT,
                r#type: "number",
                value: "{value}",
                oninput: move |evt: FormEvent| update(evt.value()),
            }
        },
        FieldInput::TextArea => rsx! {
            textarea {
                class: INPUT,
                rows: 4,
                value: "{value}",
                oninput: move |evt: FormEvent| update(evt.value()),
            }
        },
        FieldInput::Select(options) => rsx! {
            select {
                class: INPUT,
                value: "{value}",
                onchange: move |evt: FormEvent| update(evt.value()),
                for (option_value, label) in options {
                    option {
                        key: "{option_value}",
                        value: "{option_value}",
                        selected: option_value == value,
                        "{label}"
                    }
                }
            }
        },
    };

    rsx! {
        label {
            class: "flex flex-col gap-1 text-xs text-neutral-600",
            "{field.label}"
            {input}
        }
    }
}
