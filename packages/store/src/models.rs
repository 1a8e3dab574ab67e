//! # Domain models for characters, servers and sheet records
//!
//! Plain JSON records as the dice-bot REST API returns them. The client never
//! owns these values: every page mount re-fetches, and writes go through the
//! API before local state changes.
//!
//! ## Context types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Character`] | A character on a Discord server. `user` is the owning Discord user id, `None` while unclaimed, or the literal `"DM"`. `own` is computed server-side for the session user. |
//! | [`Server`] | A Discord server (guild) the bot is a member of. |
//! | [`DiscordUser`] | A Discord user, with the optional per-server `nick`. |
//!
//! ## Sheet records
//!
//! Every record has an `id` and a `name` that is unique within its
//! (owner, category) scope. The category-specific fields are:
//!
//! | Struct | Category | Fields |
//! |--------|----------|--------|
//! | [`Information`] | `information` | `description` |
//! | [`Variable`] | `variables` | `value` |
//! | [`Roll`] | `rolls` | `expression` |
//! | [`Resource`] | `resources` | `current`, `max`, `recover` |
//! | [`Spell`] | `spells` | `level`, `description` |
//! | [`Item`] | `inventory` | `number`, `description` |
//! | [`Constant`] | `constants` (server scope) | `value` |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Owner value the bot uses for characters run by the game master.
pub const DM_USER: &str = "DM";

/// A character as returned by `/api/characters/{id}` and the server rosters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    /// Discord server id the character belongs to.
    pub server: String,
    /// Owning Discord user id, `None` while unclaimed.
    pub user: Option<String>,
    /// Whether the session user owns this character.
    #[serde(default)]
    pub own: bool,
}

impl Character {
    pub fn is_claimed(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_dm(&self) -> bool {
        self.user.as_deref() == Some(DM_USER)
    }

    /// Id of the owning Discord user, if it is a real user rather than the DM marker.
    pub fn owner_id(&self) -> Option<&str> {
        self.user.as_deref().filter(|user| *user != DM_USER)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl DiscordUser {
    /// `nick (username)` when the user has a server nickname, else `username`.
    pub fn display_name(&self) -> String {
        match &self.nick {
            Some(nick) => format!("{nick} ({})", self.username),
            None => self.username.clone(),
        }
    }
}

/// When a resource recovers its uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recover {
    Short,
    Long,
    #[default]
    Other,
}

impl Recover {
    pub const ALL: [Recover; 3] = [Recover::Short, Recover::Long, Recover::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Recover::Short => "short",
            Recover::Long => "long",
            Recover::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|recover| recover.as_str() == value)
    }

    /// Label shown in the edit form's select box.
    pub fn label(self) -> &'static str {
        match self {
            Recover::Short => "short rest",
            Recover::Long => "long rest",
            Recover::Other => "other",
        }
    }
}

impl fmt::Display for Recover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Information {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: i64,
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    pub id: i64,
    pub name: String,
    pub expression: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub current: i64,
    pub max: i64,
    pub recover: Recover,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub id: i64,
    pub name: String,
    pub level: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Inventory entry. `number` is the quantity carried.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub number: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Server-wide named value shared by every character on the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub id: i64,
    pub name: String,
    pub value: i64,
}
