//! Session model - the single persisted root document

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Classroom;

/// Root document holding every classroom
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub classes: Vec<Classroom>,
    /// Classroom selected for interaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_class_id: Option<Uuid>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classroom(&self, class_id: Uuid) -> Option<&Classroom> {
        self.classes.iter().find(|c| c.id == class_id)
    }

    pub fn classroom_mut(&mut self, class_id: Uuid) -> Option<&mut Classroom> {
        self.classes.iter_mut().find(|c| c.id == class_id)
    }

    /// The current classroom, if set and still present
    pub fn current_classroom(&self) -> Option<&Classroom> {
        self.current_class_id.and_then(|id| self.classroom(id))
    }

    /// Remove a classroom and its students. Returns false if not found.
    pub fn remove_classroom(&mut self, class_id: Uuid) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c.id != class_id);
        if self.current_class_id == Some(class_id) {
            self.current_class_id = None;
        }
        self.classes.len() != before
    }
}
