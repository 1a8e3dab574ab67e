//! Client-side state of one record collection.
//!
//! [`RecordList`] is immutable: every add, update and delete produces a new
//! value. Rows are matched by record id, never by position or identity, so
//! responses that resolve out of issue order merge safely:
//!
//! - a replacement for an id that is no longer listed is dropped, which keeps a
//!   late `PATCH` response from resurrecting a deleted row;
//! - removing an id that is already gone is a no-op;
//! - appends keep arrival order.

use crate::kind::RecordKind;

/// A state change produced by a completed request.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition<R> {
    Append(R),
    Replace(R),
    Remove(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordList<R> {
    data: Option<Vec<R>>,
}

impl<R> Default for RecordList<R> {
    fn default() -> Self {
        Self { data: None }
    }
}

impl<R: RecordKind> RecordList<R> {
    /// Nothing fetched yet.
    pub fn loading() -> Self {
        Self { data: None }
    }

    pub fn loaded(records: Vec<R>) -> Self {
        Self {
            data: Some(records),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_none()
    }

    /// Loaded records, `None` while loading.
    pub fn records(&self) -> Option<&[R]> {
        self.data.as_deref()
    }

    pub fn get(&self, id: i64) -> Option<&R> {
        self.records()?.iter().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records().map_or(0, <[R]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a completed request. A list that is still loading is left as is;
    /// the pending load will bring the server's view anyway.
    pub fn apply(&self, transition: Transition<R>) -> Self {
        let Some(records) = &self.data else {
            return Self::loading();
        };
        let next = match transition {
            Transition::Append(record) => records
                .iter()
                .cloned()
                .chain(std::iter::once(record))
                .collect(),
            Transition::Replace(record) => records
                .iter()
                .map(|current| {
                    if current.id() == record.id() {
                        record.clone()
                    } else {
                        current.clone()
                    }
                })
                .collect(),
            Transition::Remove(id) => records
                .iter()
                .filter(|current| current.id() != id)
                .cloned()
                .collect(),
        };
        Self::loaded(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Variable;

    fn var(id: i64, name: &str, value: i64) -> Variable {
        Variable {
            id,
            name: name.into(),
            value,
        }
    }

    #[test]
    fn append_keeps_arrival_order() {
        let list = RecordList::loaded(vec![var(2, "str", 10)])
            .apply(Transition::Append(var(1, "dex", 14)));
        let names: Vec<_> = list.records().unwrap().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["str", "dex"]);
    }

    #[test]
    fn replace_matches_by_id() {
        let list = RecordList::loaded(vec![var(1, "str", 10), var(2, "dex", 14)])
            .apply(Transition::Replace(var(2, "dex", 16)));
        assert_eq!(list.get(2).unwrap().value, 16);
        assert_eq!(list.get(1).unwrap().value, 10);
    }

    #[test]
    fn late_replace_does_not_resurrect_deleted_row() {
        let list = RecordList::loaded(vec![var(1, "str", 10), var(2, "dex", 14)])
            .apply(Transition::Remove(2))
            .apply(Transition::Replace(var(2, "dex", 16)));
        assert_eq!(list.len(), 1);
        assert!(list.get(2).is_none());
    }

    #[test]
    fn default_is_loading() {
        let list = RecordList::<Variable>::default();
        assert_eq!(list, RecordList::loading());
        assert!(list.records().is_none());
    }

    #[test]
    fn removing_missing_id_is_noop() {
        let list = RecordList::loaded(vec![var(1, "str", 10)]);
        assert_eq!(list.apply(Transition::Remove(9)), list);
    }

    #[test]
    fn transitions_while_loading_are_ignored() {
        let list = RecordList::<Variable>::loading().apply(Transition::Append(var(1, "str", 10)));
        assert!(list.is_loading());
        assert!(list.is_empty());
    }

    #[test]
    fn apply_leaves_original_untouched() {
        let original = RecordList::loaded(vec![var(1, "str", 10)]);
        let _ = original.apply(Transition::Remove(1));
        assert_eq!(original.len(), 1);
    }
}
