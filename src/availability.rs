//! Who is free and eligible for a candidate slot, given what is committed so far.

use std::collections::BTreeMap;

use crate::data::{Student, StudentId, Subject, SubjectId, Teacher, TeacherId};
use crate::fatigue::FatigueChecker;
use crate::index::{BookingIndex, CapabilityIndex, DemandTracker};
use crate::interval::TimeInterval;

/// Committed bookings for teachers and students.
///
/// Classrooms need no index: the solver walks each one exactly once.
#[derive(Debug, Clone, Default)]
pub struct Bookings {
    pub teachers: BookingIndex<TeacherId>,
    pub students: BookingIndex<StudentId>,
}

/// Teachers with no conflicting lesson whose working hours contain the slot.
///
/// `teachers` is expected in enumeration order (ascending id).
pub fn available_teachers<'a>(
    teachers: &[&'a Teacher],
    bookings: &Bookings,
    slot: &TimeInterval,
) -> Vec<&'a Teacher> {
    teachers
        .iter()
        .copied()
        .filter(|teacher| bookings.teachers.is_free(teacher.id, slot))
        .filter(|teacher| slot.within_hours(teacher.work_start, teacher.work_end))
        .collect()
}

/// Every (subject, teacher) pair available teachers could run, teacher id
/// ascending then subject id ascending.
pub fn candidate_pairs<'a>(
    available: &[&'a Teacher],
    capabilities: &CapabilityIndex,
    subjects: &BTreeMap<SubjectId, &'a Subject>,
) -> Vec<(&'a Subject, &'a Teacher)> {
    available
        .iter()
        .flat_map(|teacher| {
            capabilities
                .subjects_of(teacher.id)
                .filter_map(|subject_id| subjects.get(&subject_id).copied())
                .map(move |subject| (subject, *teacher))
        })
        .collect()
}

/// Read-only view of run state needed to decide student eligibility.
pub struct EligibilityView<'r> {
    pub demand: &'r DemandTracker,
    pub bookings: &'r Bookings,
    pub fatigue: &'r FatigueChecker,
}

impl EligibilityView<'_> {
    pub fn is_eligible(&self, student: &Student, subject: &Subject, slot: &TimeInterval) -> bool {
        student.level == subject.level
            && self.demand.needs(student.id, subject.id)
            && self.bookings.students.is_free(student.id, slot)
            && self.fatigue.allows(student.id, subject.id, slot.start)
    }

    /// Students that could attend `subject` in `slot`, in input order.
    pub fn eligible_students<'a>(
        &self,
        students: &'a [Student],
        subject: &Subject,
        slot: &TimeInterval,
    ) -> Vec<&'a Student> {
        students
            .iter()
            .filter(|student| self.is_eligible(student, subject, slot))
            .collect()
    }
}
