//! Record categories and the per-category field schema.
//!
//! [`Category`] names the REST collection (`/api/characters/{id}/{path}`) and
//! carries the ordered field schema that drives both the edit forms in
//! [`crate::form`] and the server emulation in the `api` crate.
//! [`RecordKind`] ties a concrete record struct to its category.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{Constant, Information, Item, Resource, Roll, Spell, Variable};

/// How a record field is typed on the wire and edited in the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// Single-line string.
    Text,
    /// Multi-line string, nullable on the wire.
    LongText,
    Integer,
    /// One of `short`, `long`, `other`.
    Recover,
}

/// One editable field of a category, in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, label: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, label, ty }
}

const NAME: FieldSpec = field("name", "name", FieldType::Text);
const DESCRIPTION: FieldSpec = field("description", "description", FieldType::LongText);

const INFORMATION_FIELDS: &[FieldSpec] = &[NAME, DESCRIPTION];
const VALUE_FIELDS: &[FieldSpec] = &[NAME, field("value", "value", FieldType::Integer)];
const ROLL_FIELDS: &[FieldSpec] = &[NAME, field("expression", "expression", FieldType::Text)];
const RESOURCE_FIELDS: &[FieldSpec] = &[
    NAME,
    field("current", "uses", FieldType::Integer),
    field("max", "max", FieldType::Integer),
    field("recover", "per", FieldType::Recover),
];
const SPELL_FIELDS: &[FieldSpec] = &[NAME, field("level", "level", FieldType::Integer), DESCRIPTION];
const ITEM_FIELDS: &[FieldSpec] = &[NAME, field("number", "quantity", FieldType::Integer), DESCRIPTION];

/// A record collection on a character sheet or a server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Information,
    Variables,
    Rolls,
    Resources,
    Spells,
    Inventory,
    Constants,
}

impl Category {
    /// Character sheet categories in the order the sheet shows them.
    pub const SHEET: [Category; 6] = [
        Category::Information,
        Category::Spells,
        Category::Variables,
        Category::Rolls,
        Category::Resources,
        Category::Inventory,
    ];

    pub const ALL: [Category; 7] = [
        Category::Information,
        Category::Variables,
        Category::Rolls,
        Category::Resources,
        Category::Spells,
        Category::Inventory,
        Category::Constants,
    ];

    /// Path segment of the REST collection.
    pub fn path(self) -> &'static str {
        match self {
            Category::Information => "information",
            Category::Variables => "variables",
            Category::Rolls => "rolls",
            Category::Resources => "resources",
            Category::Spells => "spells",
            Category::Inventory => "inventory",
            Category::Constants => "constants",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.path() == path)
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Information => "Information",
            Category::Variables => "Variables",
            Category::Rolls => "Rolls",
            Category::Resources => "Resources",
            Category::Spells => "Spells",
            Category::Inventory => "Inventory",
            Category::Constants => "Constants",
        }
    }

    /// Editable fields in form order. `id` is never editable.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Category::Information => INFORMATION_FIELDS,
            Category::Variables | Category::Constants => VALUE_FIELDS,
            Category::Rolls => ROLL_FIELDS,
            Category::Resources => RESOURCE_FIELDS,
            Category::Spells => SPELL_FIELDS,
            Category::Inventory => ITEM_FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }

    /// Whether the collection hangs off a server rather than a character.
    pub fn is_server_scoped(self) -> bool {
        matches!(self, Category::Constants)
    }
}

/// A concrete record struct bound to its category.
pub trait RecordKind: Clone + PartialEq + Serialize + DeserializeOwned + 'static {
    const CATEGORY: Category;

    fn id(&self) -> i64;

    fn name(&self) -> &str;

    /// One-line read-only rendering, e.g. `Rage: 2/3 per long rest`.
    fn summary(&self) -> String;

    /// Free text shown under the summary, if the category has one.
    fn description(&self) -> Option<&str> {
        None
    }
}

impl RecordKind for Information {
    const CATEGORY: Category = Category::Information;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }
}

impl RecordKind for Variable {
    const CATEGORY: Category = Category::Variables;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

impl RecordKind for Roll {
    const CATEGORY: Category = Category::Rolls;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{}: {}", self.name, self.expression)
    }
}

impl RecordKind for Resource {
    const CATEGORY: Category = Category::Resources;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!(
            "{}: {}/{} per {} rest",
            self.name, self.current, self.max, self.recover
        )
    }
}

impl RecordKind for Spell {
    const CATEGORY: Category = Category::Spells;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} | level: {}", self.name, self.level)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }
}

impl RecordKind for Item {
    const CATEGORY: Category = Category::Inventory;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} | quantity: {}", self.name, self.number)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }
}

impl RecordKind for Constant {
    const CATEGORY: Category = Category::Constants;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recover;

    #[test]
    fn category_paths_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_path(category.path()), Some(category));
        }
        assert_eq!(Category::from_path("feats"), None);
    }

    #[test]
    fn sheet_order_starts_with_information_then_spells() {
        assert_eq!(Category::SHEET[0], Category::Information);
        assert_eq!(Category::SHEET[1], Category::Spells);
        assert!(!Category::SHEET.contains(&Category::Constants));
        assert!(Category::Constants.is_server_scoped());
    }

    #[test]
    fn every_schema_starts_with_name() {
        for category in Category::ALL {
            assert_eq!(category.fields()[0].name, "name");
        }
        assert_eq!(
            Category::Resources.field("recover").map(|spec| spec.ty),
            Some(FieldType::Recover)
        );
    }

    #[test]
    fn resource_summary_reads_per_rest() {
        let rage = Resource {
            id: 1,
            name: "Rage".into(),
            current: 2,
            max: 3,
            recover: Recover::Long,
        };
        assert_eq!(rage.summary(), "Rage: 2/3 per long rest");
    }

    #[test]
    fn empty_description_is_hidden() {
        let info = Information {
            id: 1,
            name: "Backstory".into(),
            description: Some(String::new()),
        };
        assert_eq!(info.description(), None);

        let spell = Spell {
            id: 2,
            name: "Light".into(),
            level: 0,
            description: Some("A glowing orb".into()),
        };
        assert_eq!(spell.summary(), "Light | level: 0");
        assert_eq!(spell.description(), Some("A glowing orb"));
    }
}
