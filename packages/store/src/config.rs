//! # Client configuration: `dicebot.toml`
//!
//! Deployment settings for the web client, parsed from the TOML file named by
//! [`ClientConfig::filename`].
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = ""                  # prefix for every /api path, empty = same origin
//!
//! [characters]
//! template_editions = ["5e"]     # one "Create <edition> template" button each
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ClientConfig`] | Top-level config with builder helpers and TOML (de)serialisation. |
//! | [`ApiConfig`] | Where the REST API lives. |
//! | [`CharactersConfig`] | Which character templates the selection page offers. |
//!
//! Every section defaults, so a missing or empty file is the default config.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub characters: CharactersConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Prepended to every `/api/...` path. Empty string means same origin.
    #[serde(default)]
    pub base_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharactersConfig {
    /// Editions accepted by `/api/make-character-template/{edition}/server/{id}`.
    #[serde(default = "default_template_editions")]
    pub template_editions: Vec<String>,
}

fn default_template_editions() -> Vec<String> {
    vec!["5e".to_string()]
}

impl Default for CharactersConfig {
    fn default() -> Self {
        Self {
            template_editions: default_template_editions(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at the given API origin.
    pub fn new(base_url: String) -> Self {
        Self {
            api: ApiConfig { base_url },
            characters: CharactersConfig::default(),
        }
    }

    /// Builder method to replace the offered template editions.
    pub fn with_editions(mut self, editions: Vec<String>) -> Self {
        self.characters.template_editions = editions;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "dicebot.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api.base_url, "");
        assert_eq!(config.characters.template_editions, ["5e"]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = ClientConfig::from_toml("[api]\nbase_url = \"https://dice.example\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://dice.example");
        assert_eq!(config.characters.template_editions, ["5e"]);
    }

    #[test]
    fn builder_output_survives_toml() {
        let config = ClientConfig::new("http://localhost:5000".to_string())
            .with_editions(vec!["5e".to_string(), "pf2".to_string()]);
        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }
}
