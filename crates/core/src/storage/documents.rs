//! Key-value document persistence

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, instrument};

use super::traits::SessionStore;
use crate::error::Result;
use crate::models::Session;

/// Raw key-value document store
pub struct DocumentStore<'a> {
    conn: &'a Connection,
}

impl<'a> DocumentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get the document stored under `key`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM documents WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// Session store backed by one row of the documents table
pub struct SqliteSessionStore<'a> {
    conn: &'a Connection,
    key: String,
}

impl<'a> SqliteSessionStore<'a> {
    pub fn new(conn: &'a Connection, key: &str) -> Self {
        Self {
            conn,
            key: key.to_string(),
        }
    }

    fn documents(&self) -> DocumentStore<'a> {
        DocumentStore::new(self.conn)
    }
}

impl SessionStore for SqliteSessionStore<'_> {
    #[instrument(skip(self), fields(key = %self.key))]
    fn load(&self) -> Result<Session> {
        match self.documents().get(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                debug!("No session document, initializing empty one");
                let session = Session::new();
                self.replace(&session)?;
                Ok(session)
            }
        }
    }

    #[instrument(skip(self, session), fields(key = %self.key, classes = session.classes.len()))]
    fn replace(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.documents().put(&self.key, &json)
    }
}
