//! Caller-side precondition checks for a scheduling snapshot.
//!
//! The solver tolerates every issue reported here (affected demand simply
//! stays unmet), so this runs in front of it rather than inside it. Detects:
//! - Duplicate ids within a collection
//! - Teachers without subjects
//! - Subjects nobody is qualified to teach
//! - Students needing a subject nobody teaches
//! - References to unknown subjects

use serde::Serialize;
use std::collections::BTreeSet;

use crate::data::{SchedulingInput, SubjectId};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationErrorKind {
    DuplicateId,
    TeacherWithoutSubjects,
    SubjectWithoutTeacher,
    UnteachableNeed,
    UnknownSubject,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks every precondition and reports all violations at once.
pub fn validate_input(input: &SchedulingInput) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique("student", input.students.iter().map(|s| s.id), &mut errors);
    check_unique("teacher", input.teachers.iter().map(|t| t.id), &mut errors);
    check_unique("subject", input.subjects.iter().map(|s| s.id), &mut errors);
    check_unique("classroom", input.classrooms.iter().map(|c| c.id), &mut errors);

    let known: BTreeSet<SubjectId> = input.subjects.iter().map(|s| s.id).collect();
    let mut taught = BTreeSet::new();

    for teacher in &input.teachers {
        if teacher.taught_subject_ids.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::TeacherWithoutSubjects,
                format!("Teacher {} must have at least one subject assigned", teacher.id),
            ));
        }
        for subject_id in &teacher.taught_subject_ids {
            if known.contains(subject_id) {
                taught.insert(*subject_id);
            } else {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSubject,
                    format!("Teacher {} references unknown subject {}", teacher.id, subject_id),
                ));
            }
        }
    }

    for subject in &input.subjects {
        if !taught.contains(&subject.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SubjectWithoutTeacher,
                format!("Subject {} must have at least one teacher assigned", subject.id),
            ));
        }
    }

    for student in &input.students {
        for subject_id in &student.needed_subject_ids {
            if !known.contains(subject_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSubject,
                    format!("Student {} references unknown subject {}", student.id, subject_id),
                ));
            } else if !taught.contains(subject_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnteachableNeed,
                    format!(
                        "Student {} needs subject {} which no teacher teaches",
                        student.id, subject_id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_unique(
    what: &str,
    ids: impl Iterator<Item = u64>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
}
