//! Read-only rendering of records, one implementation per category.
//!
//! The edit side needs no per-category code: [`store::EditDraft::of`] builds
//! the form from the category schema.

use dioxus::prelude::*;
use store::{Constant, Information, Item, RecordKind, Resource, Roll, Spell, Variable};

use crate::display::Paragraphs;

pub trait RecordView: RecordKind {
    fn read(&self) -> Element {
        let summary = self.summary();
        let description = self.description().map(str::to_string);
        rsx! {
            div {
                span { class: "text-sm text-neutral-800", "{summary}" }
                if let Some(text) = description {
                    div { class: "mt-1", Paragraphs { text } }
                }
            }
        }
    }
}

impl RecordView for Information {
    fn read(&self) -> Element {
        let description = self.description().map(str::to_string);
        rsx! {
            div {
                h4 { class: "m-0 mb-1 text-sm font-semibold text-neutral-800", "{self.name}" }
                if let Some(text) = description {
                    Paragraphs { text }
                }
            }
        }
    }
}

impl RecordView for Variable {}

impl RecordView for Roll {
    fn read(&self) -> Element {
        rsx! {
            div {
                class: "text-sm text-neutral-800",
                span { class: "font-medium", "{self.name}" }
                ": "
                code { class: "font-mono text-neutral-600", "{self.expression}" }
            }
        }
    }
}

impl RecordView for Resource {}

impl RecordView for Spell {}

impl RecordView for Item {}

impl RecordView for Constant {}
