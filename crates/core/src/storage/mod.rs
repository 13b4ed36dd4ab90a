//! SQLite storage layer for Roster
//!
//! The whole roster lives in a single JSON document stored under one key
//! of a key-value table. Every write replaces the document.

mod documents;
mod memory;
mod migrations;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;

pub use documents::{DocumentStore, SqliteSessionStore};
pub use memory::MemoryStore;
pub use traits::SessionStore;

/// Key the session document is stored under unless configured otherwise
pub const DEFAULT_DOCUMENT_KEY: &str = "teacherhub_data";

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get raw key-value document store
    pub fn documents(&self) -> DocumentStore<'_> {
        DocumentStore::new(&self.conn)
    }

    /// Get a session store bound to one document key
    pub fn session_store(&self, key: &str) -> SqliteSessionStore<'_> {
        SqliteSessionStore::new(&self.conn, key)
    }
}
