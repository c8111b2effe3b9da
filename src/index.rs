//! Lookup structures built once per run and updated as lessons commit.
//!
//! Ordered maps are used throughout so that enumeration order (and with it
//! the produced schedule) depends only on the input ids.

use chrono::NaiveDateTime;
use log::warn;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::GridConfig;
use crate::data::{DemandMap, Student, StudentId, Subject, SubjectId, Teacher, TeacherId};
use crate::error::SolveError;
use crate::interval::TimeInterval;

/// teacher -> subjects they may teach
#[derive(Debug, Clone, Default)]
pub struct CapabilityIndex {
    by_teacher: BTreeMap<TeacherId, BTreeSet<SubjectId>>,
}

impl CapabilityIndex {
    pub fn build(teachers: &[Teacher], subjects: &BTreeMap<SubjectId, &Subject>) -> Self {
        let mut by_teacher: BTreeMap<TeacherId, BTreeSet<SubjectId>> = BTreeMap::new();
        for teacher in teachers {
            let taught = by_teacher.entry(teacher.id).or_default();
            for subject_id in &teacher.taught_subject_ids {
                if subjects.contains_key(subject_id) {
                    taught.insert(*subject_id);
                } else {
                    warn!(
                        "Teacher {} lists unknown subject {}; ignoring it.",
                        teacher.id, subject_id
                    );
                }
            }
        }
        Self { by_teacher }
    }

    /// Subjects of `teacher`, ascending by id.
    pub fn subjects_of(&self, teacher: TeacherId) -> impl Iterator<Item = SubjectId> + '_ {
        self.by_teacher
            .get(&teacher)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// (student, subject) -> lessons still required this week
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandTracker {
    remaining: DemandMap,
}

impl DemandTracker {
    pub fn build(
        students: &[Student],
        subjects: &BTreeMap<SubjectId, &Subject>,
        grid: &GridConfig,
    ) -> Result<Self, SolveError> {
        let mut remaining = DemandMap::new();
        for student in students {
            let needs = remaining.entry(student.id).or_default();
            for subject_id in &student.needed_subject_ids {
                let subject = subjects.get(subject_id).ok_or(SolveError::UnknownSubject {
                    student_id: student.id,
                    subject_id: *subject_id,
                })?;
                needs.insert(*subject_id, grid.lessons_for(subject.weekly_minutes));
            }
        }
        Ok(Self { remaining })
    }

    pub fn remaining(&self, student: StudentId, subject: SubjectId) -> u32 {
        self.remaining
            .get(&student)
            .and_then(|needs| needs.get(&subject))
            .copied()
            .unwrap_or(0)
    }

    pub fn needs(&self, student: StudentId, subject: SubjectId) -> bool {
        self.remaining(student, subject) > 0
    }

    /// Records one attended lesson. Never goes below zero.
    pub fn decrement(&mut self, student: StudentId, subject: SubjectId) {
        if let Some(left) = self
            .remaining
            .get_mut(&student)
            .and_then(|needs| needs.get_mut(&subject))
        {
            *left = left.saturating_sub(1);
        }
    }

    pub fn total_remaining(&self) -> u32 {
        self.remaining.values().flat_map(|needs| needs.values()).sum()
    }

    pub fn as_map(&self) -> &DemandMap {
        &self.remaining
    }

    pub fn into_map(self) -> DemandMap {
        self.remaining
    }
}

/// Committed intervals per resource, kept sorted by start.
///
/// Intervals for one resource never conflict with each other, so a conflict
/// check only has to look at the last interval starting no later than the
/// candidate's end.
#[derive(Debug, Clone)]
pub struct BookingIndex<K: Ord> {
    booked: BTreeMap<K, BTreeMap<NaiveDateTime, TimeInterval>>,
}

impl<K: Ord> Default for BookingIndex<K> {
    fn default() -> Self {
        Self {
            booked: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> BookingIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_free(&self, resource: K, slot: &TimeInterval) -> bool {
        let Some(intervals) = self.booked.get(&resource) else {
            return true;
        };
        match intervals.range(..=slot.end).next_back() {
            Some((_, booked)) => !booked.overlaps(slot),
            None => true,
        }
    }

    pub fn book(&mut self, resource: K, slot: TimeInterval) {
        self.booked.entry(resource).or_default().insert(slot.start, slot);
    }
}
