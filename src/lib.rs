//! Local-first personal contacts core: a SQLite contact table behind a
//! single-writer async repository, a live full-list query, profile photo
//! preparation, and a watchable application snapshot for UI screens to
//! render.
//!
//! # Examples
//!
//! Draft-to-contact save path:
//! ```
//! use rolodex::{contact::ContactDraft, types::now_ms};
//!
//! let mut draft = ContactDraft::default();
//! draft.name = "Ann".to_string();
//! draft.phone_number = "555-0100".to_string();
//!
//! let contact = draft.into_contact(now_ms());
//! assert!(!contact.is_blank());
//! ```
//!
//! Runtime usage with the SQLite table:
//! ```no_run
//! use rolodex::{
//!     app::handle::{spawn_app, AppConfig},
//!     repo::handle::{spawn_contacts, RepoConfig},
//!     store::sqlite::SqliteContactTable,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let path = SqliteContactTable::default_path().expect("data path");
//! let table = SqliteContactTable::open(path).expect("open table");
//! let repo = spawn_contacts(Box::new(table), RepoConfig::default());
//! let app = spawn_app(repo.clone(), AppConfig::default());
//!
//! let mut screen = app.subscribe();
//! screen.changed().await.expect("state stream");
//! assert!(!screen.borrow().is_loading);
//!
//! repo.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Application state holder and its observable snapshot.
pub mod app;
/// Contact domain record and scratch edit draft.
pub mod contact;
/// Picked-image preparation pipeline.
pub mod media;
/// Single-writer contact repository and live query.
pub mod repo;
/// Durable contact table trait and SQLite implementation.
pub mod store;
/// Telephony collaborator seam.
pub mod telephony;
/// Shared primitive types and helpers.
pub mod types;
