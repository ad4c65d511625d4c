//! Shared domain types for Herdgate.
//!
//! Herdgate aggregates livestock records stored across independently
//! configured realtime-database projects. This crate holds the types the
//! other crates agree on:
//! - [`RecordKind`] — the two-way collection discriminator plus the pure
//!   path locator
//! - [`TaggedRecord`] — a record tagged with its source project
//! - [`HistoryEntry`] — one undoable change captured before an external write
//! - [`ProjectCredential`] — the decrypted connection material for one project

mod credential;
mod history;
mod kind;
mod record;

pub use credential::{CredentialSummary, CredentialUpdate, NewCredential, ProjectCredential};
pub use history::{HistoryEntry, NewHistoryEntry};
pub use kind::{RecordKind, UnknownKind};
pub use record::TaggedRecord;
