use dioxus::prelude::*;

/// Button that disables itself and shows `Loading...` while `loading` is set.
#[component]
pub fn LoadingButton(
    loading: bool,
    onclick: EventHandler<()>,
    #[props(default = "px-3 py-1.5 rounded bg-neutral-800 text-white text-sm".to_string())]
    class: String,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "{class}",
            disabled: loading,
            onclick: move |_| {
                if !loading {
                    onclick.call(());
                }
            },
            if loading {
                "Loading..."
            } else {
                {children}
            }
        }
    }
}
