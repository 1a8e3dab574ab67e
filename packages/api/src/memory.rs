//! # In-memory dice-bot server
//!
//! [`MemoryBackend`] implements [`Transport`] without a network, holding users,
//! servers, characters and records in a shared map. It enforces the same
//! status-code contract as the real REST API so client flows can be tested
//! end to end:
//!
//! | Condition | Status |
//! |-----------|--------|
//! | no session user | 401 |
//! | write to a character the session user does not own | 403 |
//! | unknown user, server, character, record id or route | 404 |
//! | name already used in the same (owner, category) or on the same server | 409 |
//! | missing name or a field of the wrong type | 400 |
//!
//! `DELETE` of a record that is already gone still succeeds, and listings are
//! ordered by name (spells by level, then name), as the real server does.
//! [`fail_next`](MemoryBackend::fail_next) injects a one-shot failure and
//! [`requests`](MemoryBackend::requests) records everything that was sent.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Map, Value};
use store::kind::FieldSpec;
use store::{Category, Character, DiscordUser, FieldType, Recover, Server};

use crate::client::Owner;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Method, Transport};

#[derive(Clone, Debug)]
struct StoredCharacter {
    id: i64,
    name: String,
    server: String,
    user: Option<String>,
}

#[derive(Debug, Default)]
struct BackendState {
    session_user: Option<String>,
    users: BTreeMap<String, DiscordUser>,
    servers: BTreeMap<String, Server>,
    characters: BTreeMap<i64, StoredCharacter>,
    records: HashMap<(Owner, Category), Vec<Map<String, Value>>>,
    next_record_id: i64,
    next_character_id: i64,
    fail_next: Option<u16>,
    requests: Vec<ApiRequest>,
}

type Response = Result<Value, u16>;

#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl PartialEq for MemoryBackend {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log in as a Discord user, registering them if needed.
    pub fn with_session_user(self, id: &str, username: &str) -> Self {
        {
            let mut state = self.lock();
            state.users.entry(id.to_string()).or_insert_with(|| DiscordUser {
                id: id.to_string(),
                username: username.to_string(),
                discriminator: "0001".to_string(),
                nick: None,
                avatar: None,
            });
            state.session_user = Some(id.to_string());
        }
        self
    }

    pub fn add_user(&self, user: DiscordUser) {
        self.lock().users.insert(user.id.clone(), user);
    }

    pub fn add_server(&self, id: &str, name: &str) {
        self.lock().servers.insert(
            id.to_string(),
            Server {
                id: id.to_string(),
                name: name.to_string(),
                icon: None,
            },
        );
    }

    pub fn add_character(&self, id: i64, name: &str, server: &str, user: Option<&str>) {
        let mut state = self.lock();
        state.next_character_id = state.next_character_id.max(id);
        state.characters.insert(
            id,
            StoredCharacter {
                id,
                name: name.to_string(),
                server: server.to_string(),
                user: user.map(str::to_string),
            },
        );
    }

    /// Store a record directly, filling unspecified fields with defaults.
    /// Returns the assigned id.
    pub fn insert_record(&self, owner: &Owner, category: Category, fields: Value) -> i64 {
        let mut state = self.lock();
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        state.store_record(owner, category, fields)
    }

    /// Delete a record behind the client's back, as another session would.
    pub fn remove_record(&self, owner: &Owner, category: Category, id: i64) {
        if let Some(records) = self.lock().records.get_mut(&(owner.clone(), category)) {
            records.retain(|record| record_id(record) != Some(id));
        }
    }

    /// Make the next request fail with `status`.
    pub fn fail_next(&self, status: u16) {
        self.lock().fail_next = Some(status);
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }
}

impl Transport for MemoryBackend {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let mut state = self.lock();
        tracing::debug!("{} {} (memory)", request.method, request.path);
        state.requests.push(request.clone());
        if let Some(status) = state.fail_next.take() {
            return Err(ApiError::status(status));
        }
        state.handle(&request).map_err(ApiError::status)
    }
}

fn record_id(record: &Map<String, Value>) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

fn record_name(record: &Map<String, Value>) -> &str {
    record.get("name").and_then(Value::as_str).unwrap_or_default()
}

fn body_name(request: &ApiRequest) -> Result<String, u16> {
    request
        .body
        .as_ref()
        .and_then(|body| body.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .ok_or(400)
}

fn default_value(ty: FieldType) -> Value {
    match ty {
        FieldType::Text | FieldType::LongText => Value::String(String::new()),
        FieldType::Integer => Value::from(0),
        FieldType::Recover => Value::String(Recover::Other.as_str().to_string()),
    }
}

fn valid_value(spec: &FieldSpec, value: &Value) -> bool {
    match spec.ty {
        FieldType::Text => value.is_string(),
        FieldType::LongText => value.is_string() || value.is_null(),
        FieldType::Integer => value.as_i64().is_some(),
        FieldType::Recover => value.as_str().and_then(Recover::parse).is_some(),
    }
}

/// Schema fields present in `body`, rejecting wrongly typed ones.
fn accepted_fields(category: Category, body: &Value) -> Result<Map<String, Value>, u16> {
    let mut accepted = Map::new();
    for spec in category.fields() {
        if let Some(value) = body.get(spec.name) {
            if !valid_value(spec, value) {
                return Err(400);
            }
            accepted.insert(spec.name.to_string(), value.clone());
        }
    }
    Ok(accepted)
}

fn sort_records(category: Category, records: &mut [Map<String, Value>]) {
    records.sort_by(|a, b| {
        let by_level = if category == Category::Spells {
            let level = |r: &Map<String, Value>| r.get("level").and_then(Value::as_i64);
            level(a).cmp(&level(b))
        } else {
            std::cmp::Ordering::Equal
        };
        by_level.then_with(|| record_name(a).cmp(record_name(b)))
    });
}

/// Records a freshly templated character starts with, per edition.
fn template_records(edition: &str) -> Option<Vec<(Category, Value)>> {
    match edition {
        "5e" => {
            let mut records: Vec<(Category, Value)> = [
                "strength",
                "dexterity",
                "constitution",
                "intelligence",
                "wisdom",
                "charisma",
            ]
            .into_iter()
            .map(|ability| (Category::Variables, json!({"name": ability, "value": 10})))
            .collect();
            records.extend([
                (Category::Variables, json!({"name": "level", "value": 1})),
                (Category::Rolls, json!({"name": "initiative", "expression": "1d20 + (dexterity - 10) / 2"})),
                (Category::Resources, json!({"name": "hit dice", "current": 1, "max": 1, "recover": "long"})),
                (Category::Information, json!({"name": "background", "description": ""})),
            ]);
            Some(records)
        }
        _ => None,
    }
}

impl BackendState {
    fn session(&self) -> Result<String, u16> {
        self.session_user.clone().ok_or(401)
    }

    fn character_view(&self, stored: &StoredCharacter) -> Value {
        let character = Character {
            id: stored.id,
            name: stored.name.clone(),
            server: stored.server.clone(),
            user: stored.user.clone(),
            own: stored.user.is_some() && stored.user == self.session_user,
        };
        serde_json::to_value(character).unwrap_or(Value::Null)
    }

    fn store_record(&mut self, owner: &Owner, category: Category, fields: Map<String, Value>) -> i64 {
        self.next_record_id += 1;
        let id = self.next_record_id;
        let mut record = Map::new();
        record.insert("id".to_string(), Value::from(id));
        for spec in category.fields() {
            let value = fields
                .get(spec.name)
                .cloned()
                .unwrap_or_else(|| default_value(spec.ty));
            record.insert(spec.name.to_string(), value);
        }
        self.records
            .entry((owner.clone(), category))
            .or_default()
            .push(record);
        id
    }

    fn handle(&mut self, request: &ApiRequest) -> Response {
        let session = self.session()?;
        let path = request.path.strip_prefix("/api/").ok_or(404u16)?;
        let segments: Vec<&str> = path.split('/').collect();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["user", "@me"]) => self.user(&session),
            (Method::Get, ["user", "@me", "servers"]) => {
                Ok(serde_json::to_value(self.servers.values().collect::<Vec<_>>()).unwrap_or_default())
            }
            (Method::Get, ["user", id]) => self.user(id),
            (Method::Get, ["server", id]) => self
                .servers
                .get(*id)
                .map(|server| json!(server))
                .ok_or(404),
            (Method::Get, ["server", id, "characters"]) => self.roster(id),
            (Method::Post, ["server", id, "characters"]) => {
                self.create_character(id, &body_name(request)?, &session)
            }
            (Method::Get, ["server", id, "characters", "@me"]) => self
                .characters
                .values()
                .find(|c| c.server == *id && c.user.as_deref() == Some(session.as_str()))
                .map(|c| self.character_view(c))
                .ok_or(404),
            (Method::Post, ["make-character-template", edition, "server", id]) => {
                let records = template_records(edition).ok_or(404u16)?;
                let character = self.create_character(id, &body_name(request)?, &session)?;
                let owner = Owner::Character(character["id"].as_i64().ok_or(500u16)?);
                for (category, fields) in records {
                    if let Value::Object(fields) = fields {
                        self.store_record(&owner, category, fields);
                    }
                }
                Ok(character)
            }
            (Method::Get, ["characters", id]) => {
                let stored = self.stored_character(id)?;
                Ok(self.character_view(&stored))
            }
            (Method::Patch, ["characters", id]) => self.patch_character(id, request, &session),
            (method, [scope, owner, category]) => {
                let (owner, category) = self.collection(scope, owner, category)?;
                match method {
                    Method::Get => self.list(&owner, category),
                    Method::Post => {
                        self.authorize_write(&owner, &session)?;
                        self.create_record(&owner, category, request)
                    }
                    _ => Err(404),
                }
            }
            (method, [scope, owner, category, item]) => {
                let (owner, category) = self.collection(scope, owner, category)?;
                let item: i64 = item.parse().map_err(|_| 404u16)?;
                self.authorize_write(&owner, &session)?;
                match method {
                    Method::Patch => self.patch_record(&owner, category, item, request),
                    Method::Delete => {
                        if let Some(records) = self.records.get_mut(&(owner, category)) {
                            records.retain(|record| record_id(record) != Some(item));
                        }
                        Ok(json!({"message": "successful"}))
                    }
                    _ => Err(404),
                }
            }
            _ => Err(404),
        }
    }

    fn user(&self, id: &str) -> Response {
        self.users.get(id).map(|user| json!(user)).ok_or(404)
    }

    fn stored_character(&self, id: &str) -> Result<StoredCharacter, u16> {
        let id: i64 = id.parse().map_err(|_| 404u16)?;
        self.characters.get(&id).cloned().ok_or(404)
    }

    fn roster(&self, server: &str) -> Response {
        if !self.servers.contains_key(server) {
            return Err(404);
        }
        let mut characters: Vec<&StoredCharacter> = self
            .characters
            .values()
            .filter(|c| c.server == server)
            .collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Value::Array(
            characters.into_iter().map(|c| self.character_view(c)).collect(),
        ))
    }

    fn name_taken_on_server(&self, server: &str, name: &str, except: Option<i64>) -> bool {
        self.characters
            .values()
            .any(|c| c.server == server && c.name == name && Some(c.id) != except)
    }

    fn create_character(&mut self, server: &str, name: &str, session: &str) -> Response {
        if !self.servers.contains_key(server) {
            return Err(404);
        }
        if self.name_taken_on_server(server, name, None) {
            return Err(409);
        }
        self.next_character_id += 1;
        let stored = StoredCharacter {
            id: self.next_character_id,
            name: name.to_string(),
            server: server.to_string(),
            user: Some(session.to_string()),
        };
        let view = self.character_view(&stored);
        self.characters.insert(stored.id, stored);
        Ok(view)
    }

    fn patch_character(&mut self, id: &str, request: &ApiRequest, session: &str) -> Response {
        let mut stored = self.stored_character(id)?;
        let body = request.body.clone().unwrap_or_default();

        match body.get("user") {
            Some(Value::String(user)) if user == "@me" => {
                if stored.user.is_some() && stored.user.as_deref() != Some(session) {
                    return Err(403);
                }
                stored.user = Some(session.to_string());
            }
            Some(Value::Null) => {
                if stored.user.as_deref() != Some(session) {
                    return Err(403);
                }
                stored.user = None;
            }
            Some(_) => return Err(400),
            None => {}
        }

        if let Some(name) = body.get("name") {
            let name = name.as_str().filter(|n| !n.trim().is_empty()).ok_or(400u16)?;
            if stored.user.as_deref() != Some(session) {
                return Err(403);
            }
            if self.name_taken_on_server(&stored.server, name, Some(stored.id)) {
                return Err(409);
            }
            stored.name = name.to_string();
        }

        let view = self.character_view(&stored);
        self.characters.insert(stored.id, stored);
        Ok(view)
    }

    fn collection(&self, scope: &str, owner: &str, category: &str) -> Result<(Owner, Category), u16> {
        let category = Category::from_path(category).ok_or(404u16)?;
        let owner = match scope {
            "characters" if !category.is_server_scoped() => {
                Owner::Character(self.stored_character(owner)?.id)
            }
            "server" if category.is_server_scoped() && self.servers.contains_key(owner) => {
                Owner::Server(owner.to_string())
            }
            _ => return Err(404),
        };
        Ok((owner, category))
    }

    fn authorize_write(&self, owner: &Owner, session: &str) -> Result<(), u16> {
        match owner {
            Owner::Character(id) => {
                let character = self.characters.get(id).ok_or(404u16)?;
                if character.user.as_deref() == Some(session) {
                    Ok(())
                } else {
                    Err(403)
                }
            }
            Owner::Server(_) => Ok(()),
        }
    }

    fn list(&self, owner: &Owner, category: Category) -> Response {
        let mut records = self
            .records
            .get(&(owner.clone(), category))
            .cloned()
            .unwrap_or_default();
        sort_records(category, &mut records);
        Ok(Value::Array(records.into_iter().map(Value::Object).collect()))
    }

    fn name_taken(&self, owner: &Owner, category: Category, name: &str, except: Option<i64>) -> bool {
        self.records
            .get(&(owner.clone(), category))
            .is_some_and(|records| {
                records
                    .iter()
                    .any(|r| record_name(r) == name && record_id(r) != except)
            })
    }

    fn create_record(&mut self, owner: &Owner, category: Category, request: &ApiRequest) -> Response {
        let name = body_name(request)?;
        let body = request.body.clone().unwrap_or_default();
        let mut fields = accepted_fields(category, &body)?;
        fields.insert("name".to_string(), Value::String(name.clone()));
        if self.name_taken(owner, category, &name, None) {
            return Err(409);
        }
        let id = self.store_record(owner, category, fields);
        self.find_record(owner, category, id)
    }

    fn find_record(&self, owner: &Owner, category: Category, id: i64) -> Response {
        self.records
            .get(&(owner.clone(), category))
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .map(|record| Value::Object(record.clone()))
            .ok_or(404)
    }

    fn patch_record(&mut self, owner: &Owner, category: Category, id: i64, request: &ApiRequest) -> Response {
        self.find_record(owner, category, id)?;
        let body = request.body.clone().unwrap_or_default();
        let changes = accepted_fields(category, &body)?;
        if let Some(name) = changes.get("name").and_then(Value::as_str) {
            if name.trim().is_empty() {
                return Err(400);
            }
            if self.name_taken(owner, category, name, Some(id)) {
                return Err(409);
            }
        }

        let records = self.records.get_mut(&(owner.clone(), category)).ok_or(404u16)?;
        let record = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or(404u16)?;
        for (field, value) in changes {
            record.insert(field, value);
        }
        Ok(Value::Object(record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Api;
    use crate::error::StatusKind;
    use store::{Spell, Variable};

    fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new().with_session_user("1001", "aria");
        backend.add_server("42", "Tavern");
        backend
    }

    #[tokio::test]
    async fn no_session_is_unauthorized() {
        let api = Api::new(MemoryBackend::new());
        let err = api.current_user(None).await.unwrap_err();
        assert!(err.is(StatusKind::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_character_name_conflicts() {
        let api = Api::new(backend());
        let aria = api.create_character("42", "Aria").await.unwrap();
        assert!(aria.own);
        let err = api.create_character("42", "Aria").await.unwrap_err();
        assert!(err.is(StatusKind::Conflict));
        assert_eq!(api.server_characters("42").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn claim_then_unclaim() {
        let backend = backend();
        backend.add_character(3, "Orphan", "42", None);
        let api = Api::new(backend);

        assert_eq!(api.unclaimed_characters("42").await.unwrap().len(), 1);
        let claimed = api.claim_character(3).await.unwrap();
        assert_eq!(claimed.user.as_deref(), Some("1001"));
        assert!(api.unclaimed_characters("42").await.unwrap().is_empty());
        assert_eq!(api.my_character("42").await.unwrap().map(|c| c.id), Some(3));

        let released = api.unclaim_character(3).await.unwrap();
        assert_eq!(released.user, None);
        assert!(!released.own);
        assert_eq!(api.my_character("42").await.unwrap(), None);
    }

    #[tokio::test]
    async fn claiming_someone_elses_character_is_forbidden() {
        let backend = backend();
        backend.add_character(4, "Bram", "42", Some("2002"));
        let err = Api::new(backend).claim_character(4).await.unwrap_err();
        assert!(err.is(StatusKind::Forbidden));
    }

    #[tokio::test]
    async fn template_seeds_records() {
        let api = Api::new(backend());
        let character = api.make_template("5e", "42", "Cleric").await.unwrap();
        let variables: Vec<Variable> = api
            .list_records(&Owner::Character(character.id))
            .await
            .unwrap();
        assert!(variables.iter().any(|v| v.name == "wisdom" && v.value == 10));

        let err = api.make_template("4e", "42", "Warlord").await.unwrap_err();
        assert!(err.is(StatusKind::NotFound));
    }

    #[tokio::test]
    async fn spells_list_by_level_then_name() {
        let backend = backend();
        backend.add_character(5, "Mage", "42", Some("1001"));
        let owner = Owner::Character(5);
        backend.insert_record(&owner, Category::Spells, json!({"name": "Shield", "level": 1}));
        backend.insert_record(&owner, Category::Spells, json!({"name": "Light", "level": 0}));
        backend.insert_record(&owner, Category::Spells, json!({"name": "Alarm", "level": 1}));

        let spells: Vec<Spell> = Api::new(backend).list_records(&owner).await.unwrap();
        let names: Vec<_> = spells.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Light", "Alarm", "Shield"]);
    }

    #[tokio::test]
    async fn wrongly_typed_patch_is_bad_request() {
        let backend = backend();
        backend.add_character(5, "Mage", "42", Some("1001"));
        let owner = Owner::Character(5);
        let id = backend.insert_record(&owner, Category::Resources, json!({"name": "Ki"}));

        let mut changes = Map::new();
        changes.insert("recover".into(), json!("weekly"));
        let err = Api::new(backend)
            .update_record::<store::Resource>(&owner, id, changes)
            .await
            .unwrap_err();
        assert!(err.is(StatusKind::BadRequest));
    }

    #[tokio::test]
    async fn deleting_twice_succeeds() {
        let backend = backend();
        backend.add_character(5, "Mage", "42", Some("1001"));
        let owner = Owner::Character(5);
        let id = backend.insert_record(&owner, Category::Rolls, json!({"name": "attack"}));
        let api = Api::new(backend);
        api.delete_record::<store::Roll>(&owner, id).await.unwrap();
        api.delete_record::<store::Roll>(&owner, id).await.unwrap();
    }

    #[tokio::test]
    async fn server_scoped_category_is_not_on_characters() {
        let backend = backend();
        backend.add_character(5, "Mage", "42", Some("1001"));
        let err = Api::new(backend)
            .list_records::<store::Constant>(&Owner::Character(5))
            .await
            .unwrap_err();
        assert!(err.is(StatusKind::NotFound));
    }
}
