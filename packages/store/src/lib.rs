pub mod config;
pub mod form;
pub mod kind;
pub mod list;
pub mod models;

pub use config::ClientConfig;
pub use form::{EditDraft, FieldError, FieldInput, FormField};
pub use kind::{Category, FieldType, RecordKind};
pub use list::{RecordList, Transition};
pub use models::{
    Character, Constant, DiscordUser, Information, Item, Recover, Resource, Roll, Server, Spell,
    Variable,
};
