use dioxus::prelude::*;
use store::{DiscordUser, Server};

/// `nick (username)`, optionally prefixed with "User: ".
#[component]
pub fn UserBadge(user: DiscordUser, #[props(default)] prefix: bool) -> Element {
    let label = user.display_name();
    rsx! {
        span {
            class: "user-badge font-medium",
            if prefix { "User: " }
            "{label}"
        }
    }
}

#[component]
pub fn ServerBadge(server: Server, #[props(default)] prefix: bool) -> Element {
    rsx! {
        span {
            class: "server-badge font-medium",
            if prefix { "Server: " }
            "{server.name}"
        }
    }
}

/// Free text rendered as plain paragraphs, one per blank-line separated block.
#[component]
pub fn Paragraphs(text: String) -> Element {
    let blocks: Vec<String> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect();
    rsx! {
        for (i, block) in blocks.into_iter().enumerate() {
            p { key: "{i}", class: "m-0 mb-2 whitespace-pre-line text-sm text-neutral-700", "{block}" }
        }
    }
}

#[component]
pub fn Loading() -> Element {
    rsx! {
        p { class: "text-neutral-500 text-sm", "Loading..." }
    }
}
