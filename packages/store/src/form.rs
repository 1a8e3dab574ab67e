//! Edit forms and partial updates.
//!
//! An [`EditDraft`] holds the uncommitted inputs of one row in edit mode. It is
//! built from a record through the category schema, so every category gets its
//! form without per-category code. [`EditDraft::changes`] yields only the
//! fields whose input differs from the record, typed for the wire, which is
//! exactly the body of the `PATCH` request.

use serde_json::{Map, Value};

use crate::kind::{Category, FieldType, RecordKind};
use crate::models::Recover;

/// Widget used to edit a field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldInput {
    Text,
    TextArea,
    Number,
    /// `(value, label)` pairs.
    Select(Vec<(String, String)>),
}

impl FieldInput {
    fn for_type(ty: FieldType) -> Self {
        match ty {
            FieldType::Text => FieldInput::Text,
            FieldType::LongText => FieldInput::TextArea,
            FieldType::Integer => FieldInput::Number,
            FieldType::Recover => FieldInput::Select(
                Recover::ALL
                    .into_iter()
                    .map(|recover| (recover.as_str().to_string(), recover.label().to_string()))
                    .collect(),
            ),
        }
    }
}

/// One input of an edit form.
#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
    ty: FieldType,
    initial: String,
    pub value: String,
}

impl FormField {
    pub fn is_changed(&self) -> bool {
        self.value != self.initial
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} must be a whole number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("{value:?} is not a valid choice for {field}")]
    InvalidChoice { field: &'static str, value: String },
}

/// Uncommitted edit of a single record.
#[derive(Clone, Debug, PartialEq)]
pub struct EditDraft {
    category: Category,
    id: i64,
    fields: Vec<FormField>,
}

impl EditDraft {
    /// Start editing `record` with every input set to its current value.
    pub fn of<R: RecordKind>(record: &R) -> Self {
        let current = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let fields = R::CATEGORY
            .fields()
            .iter()
            .map(|spec| {
                let initial = current.get(spec.name).map(input_text).unwrap_or_default();
                FormField {
                    name: spec.name,
                    label: spec.label,
                    input: FieldInput::for_type(spec.ty),
                    ty: spec.ty,
                    value: initial.clone(),
                    initial,
                }
            })
            .collect();
        Self {
            category: R::CATEGORY,
            id: record.id(),
            fields,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Id of the record being edited.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Replace the input of `name`. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.name == name) {
            field.value = value.into();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(FormField::is_changed)
    }

    /// Names of the fields whose input differs from the record.
    pub fn changed_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.is_changed())
            .map(|field| field.name)
            .collect()
    }

    /// Wire-typed values of the changed fields only.
    pub fn changes(&self) -> Result<Map<String, Value>, FieldError> {
        let mut changes = Map::new();
        for field in self.fields.iter().filter(|field| field.is_changed()) {
            changes.insert(field.name.to_string(), wire_value(field)?);
        }
        Ok(changes)
    }
}

fn input_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn wire_value(field: &FormField) -> Result<Value, FieldError> {
    match field.ty {
        FieldType::Text | FieldType::LongText => Ok(Value::String(field.value.clone())),
        FieldType::Integer => field
            .value
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| FieldError::NotANumber {
                field: field.name,
                value: field.value.clone(),
            }),
        FieldType::Recover => Recover::parse(&field.value)
            .map(|recover| Value::String(recover.as_str().to_string()))
            .ok_or_else(|| FieldError::InvalidChoice {
                field: field.name,
                value: field.value.clone(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resource, Spell};
    use serde_json::json;

    fn rage() -> Resource {
        Resource {
            id: 1,
            name: "Rage".into(),
            current: 2,
            max: 3,
            recover: Recover::Long,
        }
    }

    #[test]
    fn draft_starts_clean_with_record_values() {
        let draft = EditDraft::of(&rage());
        assert!(!draft.is_dirty());
        assert_eq!(draft.id(), 1);
        assert_eq!(draft.value("current"), Some("2"));
        assert_eq!(draft.value("recover"), Some("long"));
        assert!(draft.changes().unwrap().is_empty());
    }

    #[test]
    fn changes_contain_only_edited_fields() {
        let mut draft = EditDraft::of(&rage());
        draft.set("current", "1");
        assert_eq!(draft.changed_names(), vec!["current"]);
        assert_eq!(Value::Object(draft.changes().unwrap()), json!({"current": 1}));
    }

    #[test]
    fn reverting_an_input_drops_it_from_changes() {
        let mut draft = EditDraft::of(&rage());
        draft.set("name", "Fury");
        draft.set("name", "Rage");
        assert!(!draft.is_dirty());
    }

    #[test]
    fn null_description_edits_as_empty_text() {
        let spell = Spell {
            id: 4,
            name: "Shield".into(),
            level: 1,
            description: None,
        };
        let mut draft = EditDraft::of(&spell);
        assert_eq!(draft.value("description"), Some(""));
        assert_eq!(draft.fields()[2].input, FieldInput::TextArea);

        draft.set("description", "+5 AC");
        assert_eq!(
            Value::Object(draft.changes().unwrap()),
            json!({"description": "+5 AC"})
        );
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        let mut draft = EditDraft::of(&rage());
        draft.set("max", "three");
        assert_eq!(
            draft.changes(),
            Err(FieldError::NotANumber {
                field: "max",
                value: "three".into()
            })
        );
    }

    #[test]
    fn recover_select_offers_every_choice() {
        let draft = EditDraft::of(&rage());
        let recover = draft.fields().iter().find(|f| f.name == "recover").unwrap();
        match &recover.input {
            FieldInput::Select(options) => assert_eq!(options.len(), 3),
            other => panic!("unexpected input {other:?}"),
        }
    }
}
