//! Student model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student on a classroom roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_absent: bool,
    /// Called since the last reset
    #[serde(default)]
    pub has_been_called: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_called_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            is_absent: false,
            has_been_called: false,
            last_called_at: None,
        }
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent
    }

    /// Mark as called at the given instant
    pub fn mark_called(&mut self, at: DateTime<Utc>) {
        self.has_been_called = true;
        self.last_called_at = Some(at);
    }

    /// Clear call history
    pub fn clear_called(&mut self) {
        self.has_been_called = false;
        self.last_called_at = None;
    }
}

/// Partial update for a student. Only `Some` fields are written.
///
/// `last_called_at: Some(None)` clears the timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub is_absent: Option<bool>,
    pub has_been_called: Option<bool>,
    pub last_called_at: Option<Option<DateTime<Utc>>>,
}

impl StudentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn absent(mut self, is_absent: bool) -> Self {
        self.is_absent = Some(is_absent);
        self
    }

    pub fn called(mut self, has_been_called: bool) -> Self {
        self.has_been_called = Some(has_been_called);
        self
    }

    pub fn last_called_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_called_at = Some(at);
        self
    }

    /// Update recording a call at `at`
    pub fn called_at(at: DateTime<Utc>) -> Self {
        Self::new().called(true).last_called_at(Some(at))
    }

    /// Shallow-merge into `student`.
    ///
    /// A student that ends up not called never keeps a call timestamp.
    pub fn apply(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name = name.clone();
        }
        if let Some(is_absent) = self.is_absent {
            student.is_absent = is_absent;
        }
        if let Some(has_been_called) = self.has_been_called {
            student.has_been_called = has_been_called;
        }
        if let Some(last_called_at) = self.last_called_at {
            student.last_called_at = last_called_at;
        }
        if !student.has_been_called {
            student.last_called_at = None;
        }
    }
}
