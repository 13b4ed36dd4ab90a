//! Storage repository traits
//!
//! The facade only sees this interface, so the backing store can be
//! SQLite, in-memory, or anything else that holds one document.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Classroom, Session};

/// Durable, single-writer repository for the session document
pub trait SessionStore {
    /// Load the document, creating and persisting an empty one if absent
    fn load(&self) -> Result<Session>;

    /// Overwrite the persisted document entirely
    fn replace(&self, session: &Session) -> Result<()>;

    /// Find a classroom by ID
    fn find_classroom(&self, class_id: Uuid) -> Result<Option<Classroom>> {
        Ok(self.load()?.classroom(class_id).cloned())
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self) -> Result<Session> {
        (**self).load()
    }

    fn replace(&self, session: &Session) -> Result<()> {
        (**self).replace(session)
    }

    fn find_classroom(&self, class_id: Uuid) -> Result<Option<Classroom>> {
        (**self).find_classroom(class_id)
    }
}
