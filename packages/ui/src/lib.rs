//! This crate contains all shared UI for the dice-bot character pages.

mod client;
pub use client::{alert, use_api, use_scoped_api, ClientApi};

mod error_handler;
pub use error_handler::{use_error_sink, ErrorHandler, ErrorList, ErrorSink};

mod display;
pub use display::{Loading, Paragraphs, ServerBadge, UserBadge};

mod record_view;
pub use record_view::RecordView;

mod record_item;
pub use record_item::RecordItem;

mod record_group;
pub use record_group::{CategoryGroup, NewRecordForm};

mod name_editor;
pub use name_editor::NameEditor;

mod loading_button;
pub use loading_button::LoadingButton;

pub mod views;
