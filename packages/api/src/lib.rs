//! # API crate: client for the dice-bot REST API
//!
//! Everything the web frontend needs to talk to the dice-bot server lives here,
//! independent of any UI framework so it can be tested natively.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`characters`] | [`CharacterManager`], create/rename/claim/unclaim of a character and the [`CharacterOutcome`] of each |
//! | [`client`] | [`Api`], the typed endpoints (users, servers, characters, record collections) |
//! | [`error`] | [`ApiError`], HTTP status classification and user-facing [`ErrorReport`]s |
//! | [`http`] | [`HttpTransport`], the `reqwest` transport used in the browser |
//! | [`memory`] | [`MemoryBackend`], an in-memory server with the same status-code contract |
//! | [`records`] | [`RecordManager`], load/add/update/delete of one record list and the [`Outcome`] of each |
//! | [`scope`] | [`RequestScope`], aborting in-flight requests when their page unmounts |
//! | [`transport`] | The [`Transport`] seam and the [`ApiRequest`] it carries |

pub mod characters;
pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod records;
pub mod scope;
pub mod transport;

pub use characters::{
    character_conflict_message, user_load_context, CharacterManager, CharacterOutcome,
};
pub use client::{Api, Owner};
pub use error::{ApiError, ErrorReport, StatusKind};
pub use http::HttpTransport;
pub use memory::MemoryBackend;
pub use records::{Outcome, RecordManager, Settled};
pub use scope::RequestScope;
pub use transport::{ApiRequest, Method, Transport};
