//! Roster facade
//!
//! The single stateful API a front end talks to. Every operation is one
//! load-modify-replace transaction against the [`SessionStore`]; ids that
//! do not resolve make the operation a silent no-op.

use std::collections::HashSet;

use chrono::Utc;
use rand::rngs::ThreadRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants::assert_session_invariants;
use crate::models::{
    Classroom, ClassroomUpdate, Session, SettingsUpdate, Student, StudentUpdate,
};
use crate::selection::{self, RandomSource};
use crate::storage::SessionStore;

/// Session facade over a store and a random source
pub struct Roster<S, R = ThreadRng> {
    store: S,
    rng: R,
}

impl<S: SessionStore> Roster<S, ThreadRng> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, rand::thread_rng())
    }
}

impl<S: SessionStore, R: RandomSource> Roster<S, R> {
    /// Create with an explicit random source (seeded or scripted in tests)
    pub fn with_rng(store: S, rng: R) -> Self {
        Self { store, rng }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current session document
    pub fn session(&self) -> Result<Session> {
        self.store.load()
    }

    pub fn find_classroom(&self, class_id: Uuid) -> Result<Option<Classroom>> {
        self.store.find_classroom(class_id)
    }

    /// The selected classroom, if set and still present
    pub fn current_classroom(&self) -> Result<Option<Classroom>> {
        Ok(self.store.load()?.current_classroom().cloned())
    }

    fn commit(&self, session: &Session) -> Result<()> {
        assert_session_invariants(session);
        self.store.replace(session)
    }

    /// Load, run `op`, and write back only if it produced a value
    fn transact<T, F>(&self, op: F) -> Result<(Session, Option<T>)>
    where
        F: FnOnce(&mut Session) -> Result<Option<T>>,
    {
        let mut session = self.store.load()?;
        match op(&mut session)? {
            Some(value) => {
                self.commit(&session)?;
                Ok((session, Some(value)))
            }
            None => Ok((session, None)),
        }
    }

    /// Run `op` against one classroom; no-op if it does not exist
    fn transact_classroom<T, F>(&self, class_id: Uuid, op: F) -> Result<(Session, Option<T>)>
    where
        F: FnOnce(&mut Classroom) -> Result<Option<T>>,
    {
        self.transact(|session| match session.classroom_mut(class_id) {
            Some(classroom) => op(classroom),
            None => {
                debug!(%class_id, "Classroom not found");
                Ok(None)
            }
        })
    }

    /// Create an empty classroom with default settings.
    ///
    /// Returns `None` without writing when the name is blank.
    #[instrument(skip(self))]
    pub fn add_classroom(&self, name: &str) -> Result<Option<Uuid>> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring blank classroom name");
            return Ok(None);
        }

        let (_, id) = self.transact(|session| {
            let classroom = Classroom::new(name.to_string());
            let id = classroom.id;
            session.classes.push(classroom);
            Ok(Some(id))
        })?;

        if let Some(id) = id {
            info!(class_id = %id, "Classroom created");
        }
        Ok(id)
    }

    /// Shallow-merge `update` into a classroom and refresh `updated_at`
    #[instrument(skip(self, update))]
    pub fn update_classroom(&self, class_id: Uuid, update: &ClassroomUpdate) -> Result<Session> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(Error::InvalidOperation(
                    "Classroom name must not be empty".to_string(),
                ));
            }
        }
        if let Some(students) = &update.students {
            validate_roster(students)?;
        }

        let (session, _) = self.transact_classroom(class_id, |classroom| {
            update.apply(classroom);
            Ok(Some(()))
        })?;
        Ok(session)
    }

    /// Merge only the named settings fields
    #[instrument(skip(self))]
    pub fn update_settings(&self, class_id: Uuid, update: SettingsUpdate) -> Result<Session> {
        let (session, _) = self.transact_classroom(class_id, |classroom| {
            update.apply(&mut classroom.settings);
            classroom.touch();
            Ok(Some(()))
        })?;
        Ok(session)
    }

    /// Remove a classroom with its students, clearing the current
    /// selection if it pointed there.
    #[instrument(skip(self))]
    pub fn delete_classroom(&self, class_id: Uuid) -> Result<Session> {
        let (session, removed) = self.transact(|session| {
            Ok(session.remove_classroom(class_id).then_some(()))
        })?;

        if removed.is_some() {
            info!(%class_id, "Classroom deleted");
        } else {
            debug!(%class_id, "Classroom not found");
        }
        Ok(session)
    }

    /// Select a classroom. The id is not validated.
    #[instrument(skip(self))]
    pub fn set_current_class(&self, class_id: Uuid) -> Result<Session> {
        let (session, _) = self.transact(|session| {
            if session.classroom(class_id).is_none() {
                warn!(%class_id, "Current class does not match any classroom");
            }
            session.current_class_id = Some(class_id);
            Ok(Some(()))
        })?;
        Ok(session)
    }

    /// Append a student. Names are not deduplicated here.
    ///
    /// Returns `None` when the classroom is missing or the name is blank.
    #[instrument(skip(self))]
    pub fn add_student(&self, class_id: Uuid, name: &str) -> Result<Option<Uuid>> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring blank student name");
            return Ok(None);
        }

        let (_, id) = self.transact_classroom(class_id, |classroom| {
            let student = Student::new(name.to_string());
            let id = student.id;
            classroom.students.push(student);
            classroom.touch();
            Ok(Some(id))
        })?;
        Ok(id)
    }

    /// Add one student per non-empty line, skipping names already on the
    /// roster or earlier in the batch (case-insensitive).
    #[instrument(skip(self, names))]
    pub fn add_students_bulk(&self, class_id: Uuid, names: &str) -> Result<Vec<Uuid>> {
        let (_, added) = self.transact_classroom(class_id, |classroom| {
            // Repeats within the batch are skipped too, unlike a plain
            // roster-only check.
            let mut seen: HashSet<String> = classroom
                .students
                .iter()
                .map(|s| s.name.to_lowercase())
                .collect();

            let mut added = Vec::new();
            for name in split_names(names, &['\n']) {
                if !seen.insert(name.to_lowercase()) {
                    debug!(name, "Skipping duplicate name");
                    continue;
                }
                let student = Student::new(name.to_string());
                added.push(student.id);
                classroom.students.push(student);
            }

            if added.is_empty() {
                return Ok(None);
            }
            classroom.touch();
            Ok(Some(added))
        })?;

        let added = added.unwrap_or_default();
        info!(count = added.len(), "Students added");
        Ok(added)
    }

    /// Shallow-merge `update` into one student
    #[instrument(skip(self, update))]
    pub fn update_student(
        &self,
        class_id: Uuid,
        student_id: Uuid,
        update: &StudentUpdate,
    ) -> Result<Session> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(Error::InvalidOperation(
                    "Student name must not be empty".to_string(),
                ));
            }
        }

        let (session, _) = self.transact_classroom(class_id, |classroom| {
            Ok(apply_student_update(classroom, student_id, update).then_some(()))
        })?;
        Ok(session)
    }

    #[instrument(skip(self))]
    pub fn delete_student(&self, class_id: Uuid, student_id: Uuid) -> Result<Session> {
        let (session, _) = self.transact_classroom(class_id, |classroom| {
            let before = classroom.students.len();
            classroom.students.retain(|s| s.id != student_id);
            if classroom.students.len() == before {
                debug!(%student_id, "Student not found");
                return Ok(None);
            }
            classroom.touch();
            Ok(Some(()))
        })?;
        Ok(session)
    }

    /// Clear call history for every student in the classroom
    #[instrument(skip(self))]
    pub fn reset_called_students(&self, class_id: Uuid) -> Result<Session> {
        let (session, _) = self.transact_classroom(class_id, |classroom| {
            reset_round(classroom);
            Ok(Some(()))
        })?;
        Ok(session)
    }

    /// Mark present students absent when their name and a fragment
    /// contain one another (case-insensitive). Fragments are separated by
    /// commas or newlines. Returns the students newly marked absent.
    #[instrument(skip(self, fragments))]
    pub fn mark_absent_by_names(&self, class_id: Uuid, fragments: &str) -> Result<Vec<Uuid>> {
        let fragments: Vec<String> = split_names(fragments, &[',', '\n'])
            .map(str::to_lowercase)
            .collect();
        if fragments.is_empty() {
            return Ok(Vec::new());
        }

        let (_, marked) = self.transact_classroom(class_id, |classroom| {
            let mut marked = Vec::new();
            for student in classroom.students.iter_mut().filter(|s| s.is_present()) {
                let name = student.name.to_lowercase();
                let matches = fragments
                    .iter()
                    .any(|f| name.contains(f.as_str()) || f.contains(name.as_str()));
                if matches {
                    student.is_absent = true;
                    marked.push(student.id);
                }
            }

            if marked.is_empty() {
                return Ok(None);
            }
            classroom.touch();
            Ok(Some(marked))
        })?;

        Ok(marked.unwrap_or_default())
    }

    /// Clear the absent flag on every student
    #[instrument(skip(self))]
    pub fn mark_all_present(&self, class_id: Uuid) -> Result<Session> {
        let (session, _) = self.transact_classroom(class_id, |classroom| {
            for student in &mut classroom.students {
                student.is_absent = false;
            }
            classroom.touch();
            Ok(Some(()))
        })?;
        Ok(session)
    }

    /// Pick the next student to call and mark them called.
    ///
    /// Returns `None`, writing nothing, when the classroom is missing or
    /// nobody is present. When every present student has already been
    /// called (and duplicates are off) the round is reset first.
    #[instrument(skip(self))]
    pub fn select_next(&mut self, class_id: Uuid) -> Result<Option<Student>> {
        let mut session = self.store.load()?;

        let picked = {
            let Some(classroom) = session.classroom_mut(class_id) else {
                debug!(%class_id, "Classroom not found");
                return Ok(None);
            };
            let Some(selection) = selection::select_next(&*classroom, &mut self.rng) else {
                debug!(%class_id, "No present students to call");
                return Ok(None);
            };

            if selection.starts_new_round {
                info!(%class_id, "Every present student called, starting new round");
                reset_round(classroom);
            }
            apply_student_update(
                classroom,
                selection.student_id,
                &StudentUpdate::called_at(Utc::now()),
            );
            debug!(pool_size = selection.pool_size, "Drew from candidate pool");
            classroom.student(selection.student_id).cloned()
        };

        self.commit(&session)?;
        if let Some(student) = &picked {
            info!(student_id = %student.id, name = %student.name, "Student called");
        }
        Ok(picked)
    }
}

/// Reject a replacement roster that would break the student invariants
fn validate_roster(students: &[Student]) -> Result<()> {
    let mut ids = HashSet::new();
    for student in students {
        if !ids.insert(student.id) {
            return Err(Error::InvalidOperation(format!(
                "Duplicate student id {} in roster",
                student.id
            )));
        }
        if student.name.trim().is_empty() {
            return Err(Error::InvalidOperation(format!(
                "Student {} has an empty name",
                student.id
            )));
        }
        if !student.has_been_called && student.last_called_at.is_some() {
            return Err(Error::InvalidOperation(format!(
                "Student {} has a call timestamp but is not called",
                student.id
            )));
        }
    }
    Ok(())
}

/// Shared path for student edits. Returns false if the student is missing.
fn apply_student_update(classroom: &mut Classroom, student_id: Uuid, update: &StudentUpdate) -> bool {
    match classroom.student_mut(student_id) {
        Some(student) => {
            update.apply(student);
            classroom.touch();
            true
        }
        None => {
            debug!(%student_id, "Student not found");
            false
        }
    }
}

fn reset_round(classroom: &mut Classroom) {
    classroom.reset_called();
    classroom.touch();
}

fn split_names<'a>(text: &'a str, separators: &'a [char]) -> impl Iterator<Item = &'a str> {
    text.split(move |c: char| separators.contains(&c))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassSettings;
    use crate::selection::ScriptedSource;
    use crate::storage::{Database, MemoryStore, DEFAULT_DOCUMENT_KEY};

    fn roster(units: Vec<f64>) -> Roster<MemoryStore, ScriptedSource> {
        Roster::with_rng(MemoryStore::new(), ScriptedSource::new(units))
    }

    fn class_with<S: SessionStore, R: RandomSource>(
        roster: &Roster<S, R>,
        names: &[&str],
    ) -> (Uuid, Vec<Uuid>) {
        let class_id = roster.add_classroom("Period 1").unwrap().unwrap();
        let ids = names
            .iter()
            .map(|name| roster.add_student(class_id, name).unwrap().unwrap())
            .collect();
        (class_id, ids)
    }

    fn student(roster: &Roster<MemoryStore, ScriptedSource>, class_id: Uuid, id: Uuid) -> Student {
        roster
            .find_classroom(class_id)
            .unwrap()
            .unwrap()
            .student(id)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_add_classroom_defaults() {
        let roster = roster(vec![0.0]);
        let class_id = roster.add_classroom("  Period 1 ").unwrap().unwrap();

        let classroom = roster.find_classroom(class_id).unwrap().unwrap();
        assert_eq!(classroom.name, "Period 1");
        assert!(classroom.students.is_empty());
        assert_eq!(classroom.settings, ClassSettings::default());
        assert_eq!(classroom.created_at, classroom.updated_at);
    }

    #[test]
    fn test_blank_classroom_name_is_ignored() {
        let roster = roster(vec![0.0]);
        assert!(roster.add_classroom("   ").unwrap().is_none());
        assert!(roster.session().unwrap().classes.is_empty());
    }

    #[test]
    fn test_classroom_ids_unique() {
        let roster = roster(vec![0.0]);
        for i in 0..20 {
            roster.add_classroom(&format!("Period {}", i)).unwrap();
        }
        let session = roster.session().unwrap();
        let ids: HashSet<Uuid> = session.classes.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_update_classroom_merges_and_touches() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &["Ada"]);
        let before = roster.find_classroom(class_id).unwrap().unwrap();

        let session = roster
            .update_classroom(class_id, &ClassroomUpdate::new().name("Algebra"))
            .unwrap();
        let after = session.classroom(class_id).unwrap();

        assert_eq!(after.name, "Algebra");
        assert_eq!(after.students, before.students);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn test_update_classroom_rejects_duplicate_student_ids() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &[]);
        let student = Student::new("Ada".to_string());

        let result = roster.update_classroom(
            class_id,
            &ClassroomUpdate::new().students(vec![student.clone(), student]),
        );
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_update_classroom_rejects_blank_student_name() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &["Ada"]);
        let before = roster.session().unwrap();

        let result = roster.update_classroom(
            class_id,
            &ClassroomUpdate::new().students(vec![Student::new("   ".to_string())]),
        );
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
        assert_eq!(roster.session().unwrap(), before);
    }

    #[test]
    fn test_update_classroom_rejects_timestamp_without_call() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &["Ada"]);
        let before = roster.session().unwrap();

        let mut grace = Student::new("Grace".to_string());
        grace.last_called_at = Some(Utc::now());
        let result =
            roster.update_classroom(class_id, &ClassroomUpdate::new().students(vec![grace]));
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
        assert_eq!(roster.session().unwrap(), before);
    }

    #[test]
    fn test_update_classroom_accepts_valid_roster() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &["Ada"]);

        let mut grace = Student::new("Grace".to_string());
        grace.mark_called(Utc::now());
        let session = roster
            .update_classroom(
                class_id,
                &ClassroomUpdate::new().students(vec![grace.clone()]),
            )
            .unwrap();
        assert_eq!(session.classroom(class_id).unwrap().students, vec![grace]);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &["Ada"]);
        let before = roster.session().unwrap();
        let ghost = Uuid::new_v4();

        roster
            .update_classroom(ghost, &ClassroomUpdate::new().name("Nope"))
            .unwrap();
        roster.delete_classroom(ghost).unwrap();
        assert!(roster.add_student(ghost, "Grace").unwrap().is_none());
        roster
            .update_student(class_id, ghost, &StudentUpdate::new().absent(true))
            .unwrap();
        roster.delete_student(class_id, ghost).unwrap();
        roster.reset_called_students(ghost).unwrap();

        assert_eq!(roster.session().unwrap(), before);
    }

    #[test]
    fn test_delete_current_classroom_clears_selection() {
        let roster = roster(vec![0.0]);
        let first = roster.add_classroom("Period 1").unwrap().unwrap();
        let second = roster.add_classroom("Period 2").unwrap().unwrap();
        roster.set_current_class(first).unwrap();

        let session = roster.delete_classroom(second).unwrap();
        assert_eq!(session.current_class_id, Some(first));

        let session = roster.delete_classroom(first).unwrap();
        assert!(session.current_class_id.is_none());
        assert!(session.classes.is_empty());
    }

    #[test]
    fn test_set_current_class_does_not_validate() {
        let roster = roster(vec![0.0]);
        let ghost = Uuid::new_v4();

        let session = roster.set_current_class(ghost).unwrap();
        assert_eq!(session.current_class_id, Some(ghost));
        assert!(roster.current_classroom().unwrap().is_none());
    }

    #[test]
    fn test_add_student_keeps_roster_order() {
        let roster = roster(vec![0.0]);
        let (class_id, ids) = class_with(&roster, &["Ada", "Grace", "Ada"]);

        let classroom = roster.find_classroom(class_id).unwrap().unwrap();
        let names: Vec<&str> = classroom.students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Grace", "Ada"]);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);
        assert!(classroom.students.iter().all(|s| !s.is_absent && !s.has_been_called));
    }

    #[test]
    fn test_bulk_add_skips_known_names() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &["Ada"]);

        let added = roster
            .add_students_bulk(class_id, "ada\n  Grace \n\nLinus\ngrace\n")
            .unwrap();
        assert_eq!(added.len(), 2);

        let classroom = roster.find_classroom(class_id).unwrap().unwrap();
        let names: Vec<&str> = classroom.students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Grace", "Linus"]);
    }

    #[test]
    fn test_update_student_merges_fields() {
        let roster = roster(vec![0.0]);
        let (class_id, ids) = class_with(&roster, &["Ada"]);

        roster
            .update_student(class_id, ids[0], &StudentUpdate::new().absent(true))
            .unwrap();

        let ada = student(&roster, class_id, ids[0]);
        assert_eq!(ada.name, "Ada");
        assert!(ada.is_absent);
        assert!(!ada.has_been_called);
    }

    #[test]
    fn test_delete_student() {
        let roster = roster(vec![0.0]);
        let (class_id, ids) = class_with(&roster, &["Ada", "Grace"]);

        let session = roster.delete_student(class_id, ids[0]).unwrap();
        let classroom = session.classroom(class_id).unwrap();
        assert_eq!(classroom.students.len(), 1);
        assert_eq!(classroom.students[0].id, ids[1]);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &["Ada", "Grace"]);
        roster.select_next(class_id).unwrap();
        roster.select_next(class_id).unwrap();

        let once = roster.reset_called_students(class_id).unwrap();
        let twice = roster.reset_called_students(class_id).unwrap();

        let students = |s: &Session| s.classroom(class_id).unwrap().students.clone();
        assert_eq!(students(&once), students(&twice));
        assert!(students(&twice)
            .iter()
            .all(|s| !s.has_been_called && s.last_called_at.is_none()));
    }

    #[test]
    fn test_mark_absent_by_partial_names() {
        let roster = roster(vec![0.0]);
        let (class_id, ids) = class_with(&roster, &["Ada Lovelace", "Grace Hopper", "Linus"]);

        let marked = roster
            .mark_absent_by_names(class_id, "lovelace, Linus Torvalds\n")
            .unwrap();
        assert_eq!(marked, vec![ids[0], ids[2]]);

        let again = roster.mark_absent_by_names(class_id, "ada").unwrap();
        assert!(again.is_empty());
        assert!(!student(&roster, class_id, ids[1]).is_absent);

        roster.mark_all_present(class_id).unwrap();
        let classroom = roster.find_classroom(class_id).unwrap().unwrap();
        assert!(classroom.students.iter().all(|s| !s.is_absent));
    }

    #[test]
    fn test_update_settings() {
        let roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &[]);

        let session = roster
            .update_settings(
                class_id,
                SettingsUpdate {
                    allow_duplicates: Some(true),
                    prioritize_new_students: None,
                },
            )
            .unwrap();
        let settings = session.classroom(class_id).unwrap().settings;
        assert!(settings.allow_duplicates);
        assert!(settings.prioritize_new_students);
    }

    #[test]
    fn test_select_from_empty_classroom() {
        let mut roster = roster(vec![0.0]);
        let (class_id, _) = class_with(&roster, &[]);
        let before = roster.store().raw();

        assert!(roster.select_next(class_id).unwrap().is_none());
        assert_eq!(roster.store().raw(), before);
    }

    #[test]
    fn test_select_with_nobody_present_does_not_reset() {
        let mut roster = roster(vec![0.0]);
        let (class_id, ids) = class_with(&roster, &["Ada"]);
        roster.select_next(class_id).unwrap();
        roster
            .update_student(class_id, ids[0], &StudentUpdate::new().absent(true))
            .unwrap();
        let before = roster.store().raw();

        assert!(roster.select_next(class_id).unwrap().is_none());
        assert_eq!(roster.store().raw(), before);
        assert!(student(&roster, class_id, ids[0]).has_been_called);
    }

    #[test]
    fn test_absent_student_then_remaining_one() {
        let mut roster = roster(vec![0.0, 0.99]);
        let (class_id, ids) = class_with(&roster, &["Ada", "Grace", "Linus"]);
        roster
            .update_student(class_id, ids[2], &StudentUpdate::new().absent(true))
            .unwrap();

        let first = roster.select_next(class_id).unwrap().unwrap();
        assert_eq!(first.id, ids[0]);
        assert!(first.has_been_called);
        assert!(first.last_called_at.is_some());

        let second = roster.select_next(class_id).unwrap().unwrap();
        assert_eq!(second.id, ids[1]);
    }

    #[test]
    fn test_no_repeats_within_a_round() {
        let mut roster = Roster::with_rng(MemoryStore::new(), rand::thread_rng());
        let (class_id, ids) = class_with(&roster, &["Ada", "Grace", "Linus", "Barbara", "Alan"]);

        let mut seen = HashSet::new();
        for _ in 0..ids.len() {
            let picked = roster.select_next(class_id).unwrap().unwrap();
            assert!(seen.insert(picked.id), "{} called twice", picked.name);
        }
        assert_eq!(seen.len(), ids.len());
    }

    #[test]
    fn test_completed_round_resets_before_drawing() {
        let mut roster = roster(vec![0.0, 0.0, 0.5]);
        let (class_id, ids) = class_with(&roster, &["Ada", "Grace"]);
        roster.select_next(class_id).unwrap();
        roster.select_next(class_id).unwrap();

        let picked = roster.select_next(class_id).unwrap().unwrap();
        assert_eq!(picked.id, ids[1]);
        assert!(picked.has_been_called);

        let classroom = roster.find_classroom(class_id).unwrap().unwrap();
        let ada = classroom.student(ids[0]).unwrap();
        assert!(!ada.has_been_called);
        assert!(ada.last_called_at.is_none());
        assert_eq!(classroom.stats().called, 1);
    }

    #[test]
    fn test_duplicates_allowed_can_repeat() {
        let mut roster = roster(vec![0.0]);
        let (class_id, ids) = class_with(&roster, &["Ada", "Grace"]);
        roster
            .update_settings(
                class_id,
                SettingsUpdate {
                    allow_duplicates: Some(true),
                    prioritize_new_students: None,
                },
            )
            .unwrap();

        for _ in 0..3 {
            let picked = roster.select_next(class_id).unwrap().unwrap();
            assert_eq!(picked.id, ids[0]);
        }
    }

    #[test]
    fn test_select_missing_classroom() {
        let mut roster = roster(vec![0.0]);
        assert!(roster.select_next(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_works_over_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let mut roster = Roster::with_rng(
            db.session_store(DEFAULT_DOCUMENT_KEY),
            ScriptedSource::new(vec![0.0]),
        );
        let (class_id, ids) = class_with(&roster, &["Ada", "Grace"]);
        roster.set_current_class(class_id).unwrap();

        let picked = roster.select_next(class_id).unwrap().unwrap();
        assert_eq!(picked.id, ids[0]);

        let reopened = db.session_store(DEFAULT_DOCUMENT_KEY).load().unwrap();
        assert_eq!(reopened.current_class_id, Some(class_id));
        assert!(reopened.classroom(class_id).unwrap().students[0].has_been_called);
    }
}
