//! Application state management

use std::path::PathBuf;

use roster_core::{Database, Result, Roster, RosterConfig, SqliteSessionStore};

/// Open database plus the document key it is read through
pub struct AppState {
    db: Database,
    document_key: String,
}

impl AppState {
    /// Open the database named by `db_override` or the config
    pub fn open(config: RosterConfig, db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => config.database_path()?,
        };

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::debug!(path = %db_path.display(), "Opening roster database");
        let db = Database::open(&db_path)?;

        Ok(Self {
            db,
            document_key: config.document_key,
        })
    }

    pub fn roster(&self) -> Roster<SqliteSessionStore<'_>> {
        Roster::new(self.db.session_store(&self.document_key))
    }
}
