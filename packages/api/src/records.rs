//! # Record list manager
//!
//! The CRUD operations behind every record group on a sheet, independent of
//! any UI framework. Each operation issues one request and resolves to an
//! [`Outcome`], which the caller folds into its [`RecordList`] with
//! [`Outcome::settle`].
//!
//! | Operation | Request | Success | Handled locally | Routed to the boundary |
//! |-----------|---------|---------|-----------------|------------------------|
//! | [`load`](RecordManager::load) | `GET {owner}/{category}` | list replaced | nothing | everything |
//! | [`add`](RecordManager::add) | `POST {owner}/{category}` `{name}` | record appended | 409 alert | everything else |
//! | [`update`](RecordManager::update) | `PATCH {owner}/{category}/{id}` changed fields only | row replaced by the server's record | 404 row dropped, 409 and 400 alert | everything else |
//! | [`delete`](RecordManager::delete) | `DELETE {owner}/{category}/{id}` | row dropped by id | 404 row dropped | everything else |
//!
//! Aborted requests settle to nothing: their owner is gone.

use store::{EditDraft, RecordKind, RecordList, Transition};

use crate::client::{Api, Owner};
use crate::error::{ApiError, ErrorReport, StatusKind};
use crate::transport::Transport;

/// Result of one manager operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<R> {
    /// A fresh listing from the server.
    Loaded(Vec<R>),
    Apply(Transition<R>),
    /// Recoverable problem shown to the user; state is unchanged.
    Alert(String),
    /// Unrecoverable problem for the nearest error boundary.
    Fail(ErrorReport),
    Ignore,
}

/// An [`Outcome`] folded into list state.
#[derive(Clone, Debug, PartialEq)]
pub struct Settled<R> {
    pub list: RecordList<R>,
    pub alert: Option<String>,
    pub report: Option<ErrorReport>,
}

impl<R: RecordKind> Outcome<R> {
    pub fn settle(self, list: &RecordList<R>) -> Settled<R> {
        let mut settled = Settled {
            list: list.clone(),
            alert: None,
            report: None,
        };
        match self {
            Outcome::Loaded(records) => settled.list = RecordList::loaded(records),
            Outcome::Apply(transition) => settled.list = list.apply(transition),
            Outcome::Alert(message) => settled.alert = Some(message),
            Outcome::Fail(report) => settled.report = Some(report),
            Outcome::Ignore => {}
        }
        settled
    }

    fn failure(err: ApiError, context: &str) -> Self {
        if err.is_aborted() {
            return Outcome::Ignore;
        }
        let report = err.report(context);
        tracing::error!("{report} ({err})");
        Outcome::Fail(report)
    }

    fn alert(message: String) -> Self {
        tracing::warn!("{message}");
        Outcome::Alert(message)
    }
}

pub fn conflict_message<R: RecordKind>() -> String {
    format!(
        "There is already an item in {} with the given name",
        R::CATEGORY.title()
    )
}

pub fn invalid_values_message<R: RecordKind>(name: &str) -> String {
    format!(
        "Cannot update item \"{name}\" in {} with the given values",
        R::CATEGORY.title()
    )
}

/// CRUD operations on one category collection of one owner.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordManager<T> {
    api: Api<T>,
    owner: Owner,
}

impl<T: Transport> RecordManager<T> {
    pub fn new(api: Api<T>, owner: Owner) -> Self {
        Self { api, owner }
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub async fn load<R: RecordKind>(&self) -> Outcome<R> {
        match self.api.list_records::<R>(&self.owner).await {
            Ok(records) => Outcome::Loaded(records),
            Err(err) => Outcome::failure(
                err,
                &format!("Failed to load {}", R::CATEGORY.title().to_lowercase()),
            ),
        }
    }

    /// Create a record named `name`, sent as typed. Blank names are a no-op.
    pub async fn add<R: RecordKind>(&self, name: &str) -> Outcome<R> {
        if name.trim().is_empty() {
            return Outcome::Ignore;
        }
        match self.api.create_record::<R>(&self.owner, name).await {
            Ok(record) => Outcome::Apply(Transition::Append(record)),
            Err(err) if err.is(StatusKind::Conflict) => Outcome::alert(conflict_message::<R>()),
            Err(err) => Outcome::failure(err, "Failed to add item"),
        }
    }

    /// Save the changed fields of `draft`. An untouched draft sends nothing.
    pub async fn update<R: RecordKind>(&self, draft: &EditDraft) -> Outcome<R> {
        let name = draft.value("name").unwrap_or_default().to_string();
        let changes = match draft.changes() {
            Ok(changes) => changes,
            Err(err) => {
                tracing::debug!("Rejected edit of {}: {err}", draft.id());
                return Outcome::alert(invalid_values_message::<R>(&name));
            }
        };
        if changes.is_empty() {
            return Outcome::Ignore;
        }

        let id = draft.id();
        match self.api.update_record::<R>(&self.owner, id, changes).await {
            Ok(record) => Outcome::Apply(Transition::Replace(record)),
            Err(err) => match err.kind() {
                Some(StatusKind::NotFound) => {
                    tracing::warn!("{} {id} vanished, dropping it", R::CATEGORY.title());
                    Outcome::Apply(Transition::Remove(id))
                }
                Some(StatusKind::Conflict) => Outcome::alert(conflict_message::<R>()),
                Some(StatusKind::BadRequest) => Outcome::alert(invalid_values_message::<R>(&name)),
                _ => Outcome::failure(err, "Failed to update item"),
            },
        }
    }

    pub async fn delete<R: RecordKind>(&self, id: i64) -> Outcome<R> {
        match self.api.delete_record::<R>(&self.owner, id).await {
            Ok(()) => Outcome::Apply(Transition::Remove(id)),
            Err(err) if err.is(StatusKind::NotFound) => {
                tracing::warn!("{} {id} already gone, dropping it", R::CATEGORY.title());
                Outcome::Apply(Transition::Remove(id))
            }
            Err(err) => Outcome::failure(err, "Failed to remove item"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use store::{Constant, Information, Recover, Resource, Variable};

    use super::*;
    use crate::memory::MemoryBackend;
    use crate::scope::RequestScope;
    use crate::transport::Method;

    const CHARACTER: i64 = 7;

    fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new().with_session_user("1001", "aria");
        backend.add_server("42", "Tavern");
        backend.add_character(CHARACTER, "Aria", "42", Some("1001"));
        backend
    }

    fn manager(backend: &MemoryBackend) -> RecordManager<MemoryBackend> {
        RecordManager::new(Api::new(backend.clone()), Owner::Character(CHARACTER))
    }

    async fn loaded<R: RecordKind>(manager: &RecordManager<MemoryBackend>) -> RecordList<R> {
        manager.load::<R>().await.settle(&RecordList::loading()).list
    }

    #[tokio::test]
    async fn load_renders_resource_rows() {
        let backend = backend();
        backend.insert_record(
            &Owner::Character(CHARACTER),
            store::Category::Resources,
            json!({"name": "Rage", "current": 2, "max": 3, "recover": "long"}),
        );
        let list = loaded::<Resource>(&manager(&backend)).await;
        let rows = list.records().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary(), "Rage: 2/3 per long rest");
    }

    #[tokio::test]
    async fn empty_category_loads_as_empty_list() {
        let backend = backend();
        let list = loaded::<Information>(&manager(&backend)).await;
        assert!(!list.is_loading());
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn add_appends_server_record() {
        let backend = backend();
        let manager = manager(&backend);
        let list = loaded::<Variable>(&manager).await;

        let settled = manager.add::<Variable>("strength").await.settle(&list);
        assert_eq!(settled.alert, None);
        let rows = settled.list.records().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "strength");
        assert_eq!(rows[0].value, 0);
    }

    #[tokio::test]
    async fn duplicate_add_alerts_once_and_keeps_state() {
        let backend = backend();
        let manager = manager(&backend);
        let list = manager
            .add::<Variable>("strength")
            .await
            .settle(&loaded::<Variable>(&manager).await)
            .list;

        let settled = manager.add::<Variable>("strength").await.settle(&list);
        assert_eq!(settled.list, list);
        assert_eq!(
            settled.alert.as_deref(),
            Some("There is already an item in Variables with the given name")
        );
        assert_eq!(settled.report, None);
    }

    #[tokio::test]
    async fn blank_add_sends_nothing() {
        let backend = backend();
        let outcome = manager(&backend).add::<Variable>("   ").await;
        assert_eq!(outcome, Outcome::Ignore);
        assert!(backend.requests().iter().all(|r| r.method != Method::Post));
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let backend = backend();
        let owner = Owner::Character(CHARACTER);
        backend.insert_record(
            &owner,
            store::Category::Resources,
            json!({"name": "Rage", "current": 2, "max": 3, "recover": "long"}),
        );
        let manager = manager(&backend);
        let list = loaded::<Resource>(&manager).await;

        let mut draft = EditDraft::of(&list.records().unwrap()[0]);
        draft.set("current", "1");
        let settled = manager.update::<Resource>(&draft).await.settle(&list);

        let patch = backend
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Patch)
            .unwrap();
        assert_eq!(patch.path, "/api/characters/7/resources/1");
        assert_eq!(patch.body, Some(json!({"current": 1})));

        let row = &settled.list.records().unwrap()[0];
        assert_eq!(row.summary(), "Rage: 1/3 per long rest");
        assert_eq!(row.recover, Recover::Long);
    }

    #[tokio::test]
    async fn untouched_draft_sends_nothing() {
        let backend = backend();
        let manager = manager(&backend);
        let list = manager
            .add::<Variable>("wisdom")
            .await
            .settle(&loaded::<Variable>(&manager).await)
            .list;
        let draft = EditDraft::of(&list.records().unwrap()[0]);
        assert_eq!(manager.update::<Variable>(&draft).await, Outcome::Ignore);
        assert!(backend.requests().iter().all(|r| r.method != Method::Patch));
    }

    #[tokio::test]
    async fn update_of_vanished_record_drops_row_quietly() {
        let backend = backend();
        let manager = manager(&backend);
        let list = manager
            .add::<Variable>("luck")
            .await
            .settle(&loaded::<Variable>(&manager).await)
            .list;
        let row = list.records().unwrap()[0].clone();

        // Deleted from another session.
        backend.remove_record(&Owner::Character(CHARACTER), store::Category::Variables, row.id);

        let mut draft = EditDraft::of(&row);
        draft.set("value", "3");
        let settled = manager.update::<Variable>(&draft).await.settle(&list);
        assert!(settled.list.is_empty());
        assert_eq!(settled.alert, None);
        assert_eq!(settled.report, None);
    }

    #[tokio::test]
    async fn delete_of_vanished_record_drops_row_quietly() {
        let backend = backend();
        let manager = manager(&backend);
        let list = manager
            .add::<Variable>("str")
            .await
            .settle(&loaded::<Variable>(&manager).await)
            .list;
        let id = list.records().unwrap()[0].id;

        backend.fail_next(404);
        let settled = manager.delete::<Variable>(id).await.settle(&list);
        assert!(settled.list.is_empty());
        assert_eq!(settled.alert, None);
        assert_eq!(settled.report, None);
    }

    #[tokio::test]
    async fn failed_delete_keeps_row_and_reports() {
        let backend = backend();
        let manager = manager(&backend);
        let list = manager
            .add::<Variable>("str")
            .await
            .settle(&loaded::<Variable>(&manager).await)
            .list;
        let id = list.records().unwrap()[0].id;

        backend.fail_next(500);
        let settled = manager.delete::<Variable>(id).await.settle(&list);
        assert_eq!(settled.list, list);
        assert_eq!(
            settled.report.map(|r| r.to_string()).as_deref(),
            Some("Failed to remove item Server error")
        );
    }

    #[tokio::test]
    async fn add_sends_name_as_typed() {
        let backend = backend();
        let manager = manager(&backend);
        let list = loaded::<Variable>(&manager).await;
        manager.add::<Variable>(" str").await.settle(&list);

        let post = backend
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Post)
            .unwrap();
        assert_eq!(post.body, Some(json!({"name": " str"})));
    }

    #[tokio::test]
    async fn rename_onto_existing_name_alerts() {
        let backend = backend();
        let manager = manager(&backend);
        let mut list = loaded::<Variable>(&manager).await;
        for name in ["str", "dex"] {
            list = manager.add::<Variable>(name).await.settle(&list).list;
        }

        let mut draft = EditDraft::of(&list.records().unwrap()[1]);
        draft.set("name", "str");
        let settled = manager.update::<Variable>(&draft).await.settle(&list);
        assert_eq!(settled.list, list);
        assert_eq!(
            settled.alert.as_deref(),
            Some("There is already an item in Variables with the given name")
        );
    }

    #[tokio::test]
    async fn unparseable_input_alerts_without_request() {
        let backend = backend();
        let manager = manager(&backend);
        let list = manager
            .add::<Variable>("str")
            .await
            .settle(&loaded::<Variable>(&manager).await)
            .list;

        let mut draft = EditDraft::of(&list.records().unwrap()[0]);
        draft.set("value", "lots");
        let outcome = manager.update::<Variable>(&draft).await;
        assert_eq!(
            outcome,
            Outcome::Alert("Cannot update item \"str\" in Variables with the given values".into())
        );
        assert!(backend.requests().iter().all(|r| r.method != Method::Patch));
    }

    #[tokio::test]
    async fn server_rejection_alerts_with_item_name() {
        let backend = backend();
        let manager = manager(&backend);
        let list = manager
            .add::<Variable>("str")
            .await
            .settle(&loaded::<Variable>(&manager).await)
            .list;

        backend.fail_next(400);
        let mut draft = EditDraft::of(&list.records().unwrap()[0]);
        draft.set("value", "12");
        let settled = manager.update::<Variable>(&draft).await.settle(&list);
        assert_eq!(
            settled.alert.as_deref(),
            Some("Cannot update item \"str\" in Variables with the given values")
        );
        assert_eq!(settled.list, list);
    }

    #[tokio::test]
    async fn delete_removes_by_id_and_late_update_cannot_resurrect() {
        let backend = backend();
        let manager = manager(&backend);
        let mut list = loaded::<Variable>(&manager).await;
        for name in ["str", "dex"] {
            list = manager.add::<Variable>(name).await.settle(&list).list;
        }
        let dex = list.records().unwrap()[1].clone();

        // The update resolves first on the server, the delete lands locally first.
        let mut draft = EditDraft::of(&dex);
        draft.set("value", "18");
        let update = manager.update::<Variable>(&draft).await;
        let delete = manager.delete::<Variable>(dex.id).await;

        list = delete.settle(&list).list;
        list = update.settle(&list).list;
        assert_eq!(list.len(), 1);
        assert!(list.get(dex.id).is_none());
    }

    #[tokio::test]
    async fn forbidden_write_goes_to_the_boundary() {
        let backend = backend();
        backend.add_character(8, "Bram", "42", Some("2002"));
        let manager = RecordManager::new(Api::new(backend.clone()), Owner::Character(8));
        let list = loaded::<Variable>(&manager).await;

        let settled = manager.add::<Variable>("str").await.settle(&list);
        assert_eq!(settled.list, list);
        assert_eq!(
            settled.report.map(|r| r.to_string()).as_deref(),
            Some("Failed to add item You do not have access to edit this character")
        );
    }

    #[tokio::test]
    async fn failed_load_names_the_category() {
        let backend = backend();
        backend.fail_next(500);
        let outcome = manager(&backend).load::<Information>().await;
        assert_eq!(
            outcome,
            Outcome::Fail(ErrorReport::new("Failed to load information Server error"))
        );
    }

    #[tokio::test]
    async fn closed_scope_settles_to_nothing() {
        let backend = backend();
        let scope = RequestScope::new();
        let manager = RecordManager::new(
            Api::new(backend.clone()).scoped(scope.clone()),
            Owner::Character(CHARACTER),
        );
        let list = loaded::<Variable>(&manager).await;

        scope.close();
        let settled = manager.add::<Variable>("str").await.settle(&list);
        assert_eq!(settled, Settled { list, alert: None, report: None });
        assert!(backend.requests().iter().all(|r| r.method != Method::Post));
    }

    #[tokio::test]
    async fn server_constants_use_server_scope() {
        let backend = backend();
        let manager = RecordManager::new(Api::new(backend.clone()), Owner::Server("42".into()));
        let list = loaded::<Constant>(&manager).await;
        let list = manager.add::<Constant>("dc").await.settle(&list).list;
        assert_eq!(list.records().unwrap()[0].name, "dc");
        assert!(backend
            .requests()
            .iter()
            .any(|r| r.method == Method::Post && r.path == "/api/server/42/constants"));
    }
}
