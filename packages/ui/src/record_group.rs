use std::marker::PhantomData;

use api::{Outcome, Owner, RecordManager};
use dioxus::prelude::*;
use store::{
    Category, Constant, Information, Item, RecordKind, RecordList, Resource, Roll, Spell, Variable,
};

use crate::client::{alert, use_scoped_api};
use crate::display::Loading;
use crate::error_handler::{use_error_sink, ErrorSink};
use crate::record_item::RecordItem;
use crate::record_view::RecordView;

const HEADER_BUTTON: &str = "px-2 py-1 rounded text-xs text-neutral-600 hover:bg-neutral-200";

/// Fold an operation's outcome into the list, alerting or reporting as needed.
pub(crate) fn settle_into<R: RecordKind>(
    mut list: Signal<RecordList<R>>,
    errors: ErrorSink,
    outcome: Outcome<R>,
) {
    let settled = outcome.settle(&list.peek());
    list.set(settled.list);
    if let Some(message) = settled.alert {
        alert(&message);
    }
    if let Some(report) = settled.report {
        errors.report(report);
    }
}

/// The record group for `category`, owned by `owner`.
#[component]
pub fn CategoryGroup(category: Category, owner: Owner, read_only: bool) -> Element {
    match category {
        Category::Information => rsx! { RecordGroup::<Information> { owner, read_only } },
        Category::Variables => rsx! { RecordGroup::<Variable> { owner, read_only } },
        Category::Rolls => rsx! { RecordGroup::<Roll> { owner, read_only } },
        Category::Resources => rsx! { RecordGroup::<Resource> { owner, read_only } },
        Category::Spells => rsx! { RecordGroup::<Spell> { owner, read_only } },
        Category::Inventory => rsx! { RecordGroup::<Item> { owner, read_only } },
        Category::Constants => rsx! { RecordGroup::<Constant> { owner, read_only } },
    }
}

/// Collapsible list of one category's records with add, edit and delete.
///
/// Loads on mount; Reload drops the rows and fetches again. In `read_only`
/// mode every write affordance is hidden.
#[component]
fn RecordGroup<R: RecordView>(
    owner: Owner,
    read_only: bool,
    #[props(default)] _kind: PhantomData<R>,
) -> Element {
    let api = use_scoped_api();
    let errors = use_error_sink();
    let manager = use_hook(|| RecordManager::new(api, owner));
    let mut list = use_signal(RecordList::<R>::loading);
    let mut open = use_signal(|| false);
    let mut adding = use_signal(|| false);

    let load = use_callback({
        let manager = manager.clone();
        move |()| {
            let manager = manager.clone();
            list.set(RecordList::loading());
            spawn(async move {
                settle_into(list, errors, manager.load::<R>().await);
            });
        }
    });
    use_hook(|| load.call(()));

    let add = use_callback({
        let manager = manager.clone();
        move |name: String| {
            let manager = manager.clone();
            adding.set(false);
            spawn(async move {
                settle_into(list, errors, manager.add::<R>(&name).await);
            });
        }
    });

    let title = R::CATEGORY.title();
    let rows = match list.read().records() {
        None => rsx! { Loading {} },
        Some(records) => rsx! {
            ul {
                class: "m-0 p-0 list-none",
                for (id, record) in records.iter().map(|r| (r.id(), r.clone())) {
                    RecordItem::<R> {
                        key: "{id}",
                        record,
                        read_only,
                        manager: manager.clone(),
                        list,
                    }
                }
            }
        },
    };

    rsx! {
        section {
            class: "record-group mb-4 rounded border border-neutral-200",
            header {
                class: "flex items-center justify-between px-3 py-2 bg-neutral-50",
                button {
                    class: "font-semibold text-neutral-800",
                    onclick: move |_| open.toggle(),
                    "{title}"
                }
                div {
                    class: "flex gap-1",
                    if open() && !read_only {
                        button {
                            class: HEADER_BUTTON,
                            onclick: move |_| adding.set(true),
                            "Add"
                        }
                    }
                    button {
                        class: HEADER_BUTTON,
                        onclick: move |_| load.call(()),
                        "Reload"
                    }
                }
            }
            if open() {
                div {
                    class: "px-3 py-2",
                    if adding() && !read_only {
                        NewRecordForm {
                            on_create: add,
                            on_cancel: move |_| adding.set(false),
                        }
                    }
                    {rows}
                }
            }
        }
    }
}

/// Inline prompt for the name of a new record.
#[component]
pub fn NewRecordForm(on_create: EventHandler<String>, on_cancel: EventHandler<()>) -> Element {
    let mut name = use_signal(String::new);

    let mut submit = move || {
        let n = name();
        if n.trim().is_empty() {
            return;
        }
        name.set(String::new());
        on_create.call(n);
    };

    rsx! {
        div {
            class: "flex gap-2 mb-2",
            input {
                class: "flex-1 bg-white border border-neutral-300 rounded px-2 py-1 text-sm outline-none focus:border-primary-500",
                r#type: "text",
                placeholder: "Name",
                value: name(),
                oninput: move |evt: FormEvent| name.set(evt.value()),
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Enter {
                        submit();
                    }
                },
            }
            button {
                class: "px-3 py-1 rounded bg-neutral-800 text-white text-sm",
                onclick: move |_| submit(),
                "Add"
            }
            button {
                class: "px-3 py-1 rounded border border-neutral-300 text-sm",
                onclick: move |_| on_cancel.call(()),
                "Cancel"
            }
        }
    }
}
