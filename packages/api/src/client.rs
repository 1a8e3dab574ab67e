//! Typed endpoints of the dice-bot REST API.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use store::{Category, Character, DiscordUser, RecordKind, Server};

use crate::error::{ApiError, StatusKind};
use crate::scope::RequestScope;
use crate::transport::{ApiRequest, Transport};

/// Who a record collection belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Character(i64),
    Server(String),
}

impl Owner {
    /// Path of the owner resource, e.g. `/api/characters/7`.
    pub fn base_path(&self) -> String {
        match self {
            Owner::Character(id) => format!("/api/characters/{id}"),
            Owner::Server(id) => format!("/api/server/{id}"),
        }
    }

    pub fn collection_path(&self, category: Category) -> String {
        format!("{}/{}", self.base_path(), category.path())
    }

    pub fn record_path(&self, category: Category, id: i64) -> String {
        format!("{}/{}/{id}", self.base_path(), category.path())
    }
}

/// Client for the REST API, optionally bound to a [`RequestScope`].
#[derive(Clone, Debug)]
pub struct Api<T> {
    transport: T,
    scope: Option<RequestScope>,
}

impl<T: PartialEq> PartialEq for Api<T> {
    fn eq(&self, other: &Self) -> bool {
        self.transport == other.transport && self.scope == other.scope
    }
}

impl<T: Transport> Api<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            scope: None,
        }
    }

    /// A copy of this client whose requests are aborted when `scope` closes.
    pub fn scoped(&self, scope: RequestScope) -> Self {
        Self {
            transport: self.transport.clone(),
            scope: Some(scope),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        match &self.scope {
            Some(scope) => scope.run(self.transport.send(request)).await,
            None => self.transport.send(request).await,
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// The logged-in Discord user. 401 when there is no session.
    pub async fn current_user(&self, server: Option<&str>) -> Result<DiscordUser, ApiError> {
        let request = ApiRequest::get("/api/user/@me");
        let request = match server {
            Some(server) => request.with_query("server", server),
            None => request,
        };
        self.fetch(request).await
    }

    /// A Discord user, with the nickname they use on `server`.
    pub async fn user(&self, id: &str, server: &str) -> Result<DiscordUser, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/user/{id}")).with_query("server", server))
            .await
    }

    /// Servers shared by the session user and the bot.
    pub async fn my_servers(&self) -> Result<Vec<Server>, ApiError> {
        self.fetch(ApiRequest::get("/api/user/@me/servers")).await
    }

    pub async fn server(&self, id: &str) -> Result<Server, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/server/{id}"))).await
    }

    pub async fn server_characters(&self, server: &str) -> Result<Vec<Character>, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/server/{server}/characters")))
            .await
    }

    /// Characters on `server` nobody has claimed yet.
    pub async fn unclaimed_characters(&self, server: &str) -> Result<Vec<Character>, ApiError> {
        let characters = self.server_characters(server).await?;
        Ok(characters
            .into_iter()
            .filter(|character| !character.is_claimed())
            .collect())
    }

    /// The session user's character on `server`, `None` when they have none.
    pub async fn my_character(&self, server: &str) -> Result<Option<Character>, ApiError> {
        let request = ApiRequest::get(format!("/api/server/{server}/characters/@me"));
        match self.fetch(request).await {
            Ok(character) => Ok(Some(character)),
            Err(err) if err.is(StatusKind::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Create a blank character. 409 when the name is taken on the server.
    pub async fn create_character(&self, server: &str, name: &str) -> Result<Character, ApiError> {
        self.fetch(ApiRequest::post(
            format!("/api/server/{server}/characters"),
            json!({ "name": name }),
        ))
        .await
    }

    /// Create a character pre-filled from an edition template.
    pub async fn make_template(
        &self,
        edition: &str,
        server: &str,
        name: &str,
    ) -> Result<Character, ApiError> {
        self.fetch(ApiRequest::post(
            format!("/api/make-character-template/{edition}/server/{server}"),
            json!({ "name": name }),
        ))
        .await
    }

    pub async fn character(&self, id: i64) -> Result<Character, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/characters/{id}"))).await
    }

    async fn patch_character(&self, id: i64, body: Value) -> Result<Character, ApiError> {
        self.fetch(ApiRequest::patch(format!("/api/characters/{id}"), body))
            .await
    }

    pub async fn rename_character(&self, id: i64, name: &str) -> Result<Character, ApiError> {
        self.patch_character(id, json!({ "name": name })).await
    }

    /// Assign an unclaimed character to the session user.
    pub async fn claim_character(&self, id: i64) -> Result<Character, ApiError> {
        self.patch_character(id, json!({ "user": "@me" })).await
    }

    /// Release the session user's character.
    pub async fn unclaim_character(&self, id: i64) -> Result<Character, ApiError> {
        self.patch_character(id, json!({ "user": null })).await
    }

    pub async fn list_records<R: RecordKind>(&self, owner: &Owner) -> Result<Vec<R>, ApiError> {
        self.fetch(ApiRequest::get(owner.collection_path(R::CATEGORY)))
            .await
    }

    pub async fn create_record<R: RecordKind>(&self, owner: &Owner, name: &str) -> Result<R, ApiError> {
        self.fetch(ApiRequest::post(
            owner.collection_path(R::CATEGORY),
            json!({ "name": name }),
        ))
        .await
    }

    /// Send only `changes`; the server answers with the full updated record.
    pub async fn update_record<R: RecordKind>(
        &self,
        owner: &Owner,
        id: i64,
        changes: Map<String, Value>,
    ) -> Result<R, ApiError> {
        self.fetch(ApiRequest::patch(
            owner.record_path(R::CATEGORY, id),
            Value::Object(changes),
        ))
        .await
    }

    pub async fn delete_record<R: RecordKind>(&self, owner: &Owner, id: i64) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(owner.record_path(R::CATEGORY, id)))
            .await
            .map(|_| ())
    }
}
