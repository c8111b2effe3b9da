use thiserror::Error;

use crate::data::{StudentId, SubjectId};

/// Conditions under which a scheduling run cannot proceed at all.
///
/// Unmet demand is not an error; it is reported alongside the schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("no {collection} supplied; a schedule cannot be built")]
    EmptyInput { collection: &'static str },

    #[error("duplicate {collection} id {id}")]
    DuplicateId { collection: &'static str, id: u64 },

    #[error("student {student_id} needs unknown subject {subject_id}")]
    UnknownSubject {
        student_id: StudentId,
        subject_id: SubjectId,
    },

    #[error("invalid slot grid: {0}")]
    InvalidGrid(String),
}
