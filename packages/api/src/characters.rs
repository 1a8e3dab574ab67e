//! # Character manager
//!
//! Create, rename, claim and unclaim a character, resolved to a
//! [`CharacterOutcome`] the page acts on.
//!
//! | Operation | Handled locally | Routed to the boundary |
//! |-----------|-----------------|------------------------|
//! | [`create`](CharacterManager::create) | blank no-op, 409 alert | everything else |
//! | [`create_from_template`](CharacterManager::create_from_template) | blank no-op, 409 alert | everything else |
//! | [`rename`](CharacterManager::rename) | blank or unchanged no-op, 409 alert | everything else |
//! | [`claim`](CharacterManager::claim) | nothing | everything |
//! | [`unclaim`](CharacterManager::unclaim) | nothing | everything |

use store::Character;

use crate::client::Api;
use crate::error::{ApiError, ErrorReport, StatusKind};
use crate::transport::Transport;

#[derive(Clone, Debug, PartialEq)]
pub enum CharacterOutcome {
    /// The server's copy of the character after the change.
    Open(Character),
    Alert(String),
    Fail(ErrorReport),
    Ignore,
}

impl CharacterOutcome {
    fn failure(err: ApiError, context: &str) -> Self {
        if err.is_aborted() {
            return CharacterOutcome::Ignore;
        }
        let report = err.report(context);
        tracing::error!("{report} ({err})");
        CharacterOutcome::Fail(report)
    }

    /// 409 on `name` alerts, anything else fails under `context`.
    fn named(result: Result<Character, ApiError>, name: &str, context: &str) -> Self {
        match result {
            Ok(character) => CharacterOutcome::Open(character),
            Err(err) if err.is(StatusKind::Conflict) => {
                let message = character_conflict_message(name);
                tracing::warn!("{message}");
                CharacterOutcome::Alert(message)
            }
            Err(err) => Self::failure(err, context),
        }
    }

    fn plain(result: Result<Character, ApiError>, context: &str) -> Self {
        match result {
            Ok(character) => CharacterOutcome::Open(character),
            Err(err) => Self::failure(err, context),
        }
    }
}

pub fn character_conflict_message(name: &str) -> String {
    format!("There is already a character named {name} on this server")
}

/// Boundary context for a failed session-user load on a server page.
pub fn user_load_context(err: &ApiError) -> &'static str {
    if err.is(StatusKind::Unauthorized) {
        "Not logged in"
    } else {
        "Failed to load user"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CharacterManager<T> {
    api: Api<T>,
}

impl<T: Transport> CharacterManager<T> {
    pub fn new(api: Api<T>) -> Self {
        Self { api }
    }

    pub async fn create(&self, server: &str, name: &str) -> CharacterOutcome {
        if name.trim().is_empty() {
            return CharacterOutcome::Ignore;
        }
        let result = self.api.create_character(server, name).await;
        CharacterOutcome::named(result, name, "Failed to create character")
    }

    pub async fn create_from_template(
        &self,
        edition: &str,
        server: &str,
        name: &str,
    ) -> CharacterOutcome {
        if name.trim().is_empty() {
            return CharacterOutcome::Ignore;
        }
        let result = self.api.make_template(edition, server, name).await;
        CharacterOutcome::named(result, name, "Failed to create character")
    }

    /// Rename `character`; nothing is sent when the name is blank or unchanged.
    pub async fn rename(&self, character: &Character, name: &str) -> CharacterOutcome {
        if name.trim().is_empty() || name == character.name {
            return CharacterOutcome::Ignore;
        }
        let result = self.api.rename_character(character.id, name).await;
        CharacterOutcome::named(result, name, "Failed to update name")
    }

    pub async fn claim(&self, id: i64) -> CharacterOutcome {
        CharacterOutcome::plain(self.api.claim_character(id).await, "Failed to claim character")
    }

    pub async fn unclaim(&self, id: i64) -> CharacterOutcome {
        CharacterOutcome::plain(
            self.api.unclaim_character(id).await,
            "Failed to unclaim character",
        )
    }
}
