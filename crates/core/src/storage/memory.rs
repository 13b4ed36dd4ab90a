//! In-memory session store
//!
//! Holds the serialized document text, so it behaves like the SQLite
//! store: loads hand out fresh copies and malformed text fails to parse.

use std::cell::RefCell;

use tracing::debug;

use super::traits::SessionStore;
use crate::error::Result;
use crate::models::Session;

#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw document text
    pub fn with_document(json: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(json.into())),
        }
    }

    /// Raw document text, if any has been written
    pub fn raw(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Session> {
        let existing = self.document.borrow().clone();
        match existing {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                debug!("No session document, initializing empty one");
                let session = Session::new();
                self.replace(&session)?;
                Ok(session)
            }
        }
    }

    fn replace(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        *self.document.borrow_mut() = Some(json);
        Ok(())
    }
}
