//! Classroom model - a named roster with calling settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Student;

/// Per-classroom random call settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSettings {
    /// Any present student may be picked, ignoring call history
    pub allow_duplicates: bool,
    /// Prefer students not yet called (only when duplicates are off)
    pub prioritize_new_students: bool,
}

impl Default for ClassSettings {
    fn default() -> Self {
        Self {
            allow_duplicates: false,
            prioritize_new_students: true,
        }
    }
}

/// Partial update for [`ClassSettings`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub allow_duplicates: Option<bool>,
    pub prioritize_new_students: Option<bool>,
}

impl SettingsUpdate {
    pub fn apply(&self, settings: &mut ClassSettings) {
        if let Some(allow) = self.allow_duplicates {
            settings.allow_duplicates = allow;
        }
        if let Some(prioritize) = self.prioritize_new_students {
            settings.prioritize_new_students = prioritize;
        }
    }
}

/// A classroom roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: Uuid,
    pub name: String,
    /// Roster order is insertion order
    #[serde(default)]
    pub students: Vec<Student>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub settings: ClassSettings,
}

impl Classroom {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            students: Vec::new(),
            created_at: now,
            updated_at: now,
            settings: ClassSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ClassSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn student(&self, student_id: Uuid) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn student_mut(&mut self, student_id: Uuid) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == student_id)
    }

    /// Case-insensitive exact name lookup
    pub fn student_by_name(&self, name: &str) -> Option<&Student> {
        let needle = name.trim().to_lowercase();
        self.students
            .iter()
            .find(|s| s.name.to_lowercase() == needle)
    }

    pub fn present_students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter().filter(|s| s.is_present())
    }

    /// Clear call history for the whole roster (new round)
    pub fn reset_called(&mut self) {
        for student in &mut self.students {
            student.clear_called();
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn stats(&self) -> RosterStats {
        let mut stats = RosterStats::default();
        for student in &self.students {
            if student.is_absent {
                stats.absent += 1;
            } else if student.has_been_called {
                stats.present += 1;
                stats.called += 1;
            } else {
                stats.present += 1;
                stats.not_called += 1;
            }
        }
        stats
    }
}

/// Partial update for a classroom.
///
/// Shallow merge: `students` and `settings` replace the whole field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassroomUpdate {
    pub name: Option<String>,
    pub students: Option<Vec<Student>>,
    pub settings: Option<ClassSettings>,
}

impl ClassroomUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn students(mut self, students: Vec<Student>) -> Self {
        self.students = Some(students);
        self
    }

    pub fn settings(mut self, settings: ClassSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Merge into `classroom` and refresh `updated_at`
    pub fn apply(&self, classroom: &mut Classroom) {
        if let Some(name) = &self.name {
            classroom.name = name.clone();
        }
        if let Some(students) = &self.students {
            classroom.students = students.clone();
        }
        if let Some(settings) = self.settings {
            classroom.settings = settings;
        }
        classroom.touch();
    }
}

/// Attendance and call counts for a roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterStats {
    pub present: usize,
    pub absent: usize,
    /// Present and not yet called
    pub not_called: usize,
    /// Present and already called
    pub called: usize,
}
