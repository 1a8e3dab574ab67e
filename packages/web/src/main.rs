use dioxus::prelude::*;

use api::{Api, HttpTransport};
use store::ClientConfig;
use views::{Character, Home, Select, Server};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/server/:server_id")]
    Server { server_id: String },
    #[route("/server/:server_id/select")]
    Select { server_id: String },
    #[route("/character/:character_id")]
    Character { character_id: i64 },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const CONFIG: &str = include_str!("../dicebot.toml");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

fn load_config() -> ClientConfig {
    ClientConfig::from_toml(CONFIG).unwrap_or_else(|e| {
        tracing::error!("Invalid {}: {e}", ClientConfig::filename());
        ClientConfig::default()
    })
}

#[component]
fn App() -> Element {
    let config = use_context_provider(load_config);
    use_context_provider(|| Api::new(HttpTransport::from_config(&config)));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        main {
            class: "max-w-3xl mx-auto p-6",
            Router::<Route> {}
        }
    }
}
