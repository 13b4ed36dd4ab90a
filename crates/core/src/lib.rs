//! Roster Core Library
//!
//! Classroom rosters, their persistence, and fair random calling.

pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod roster;
pub mod selection;
pub mod storage;

pub use config::RosterConfig;
pub use error::{Error, Result};
pub use models::*;
pub use roster::Roster;
pub use selection::{RandomSource, Selection};
pub use storage::{
    Database, DocumentStore, MemoryStore, SessionStore, SqliteSessionStore, DEFAULT_DOCUMENT_KEY,
};
