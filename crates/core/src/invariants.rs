//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Classroom, Session, Student};

/// Validate a whole session document before it is written.
///
/// `current_class_id` is not checked: selecting a class does not
/// validate the id.
pub fn assert_session_invariants(session: &Session) {
    let mut class_ids = HashSet::new();
    for classroom in &session.classes {
        debug_assert!(
            class_ids.insert(classroom.id),
            "Duplicate classroom id {}",
            classroom.id
        );
        assert_classroom_invariants(classroom);
    }
}

/// Validate that a classroom's roster is internally consistent
pub fn assert_classroom_invariants(classroom: &Classroom) {
    debug_assert!(
        !classroom.name.trim().is_empty(),
        "Classroom {} has empty name",
        classroom.id
    );

    let mut student_ids = HashSet::new();
    for student in &classroom.students {
        debug_assert!(
            student_ids.insert(student.id),
            "Classroom {} has duplicate student id {}",
            classroom.id,
            student.id
        );
        assert_student_invariants(student);
    }
}

/// Validate a single student record
pub fn assert_student_invariants(student: &Student) {
    debug_assert!(
        !student.name.trim().is_empty(),
        "Student {} has empty name",
        student.id
    );

    debug_assert!(
        student.has_been_called || student.last_called_at.is_none(),
        "Student {} has a call timestamp but is not called",
        student.id
    );
}
