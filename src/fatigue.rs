//! Anti-fatigue rule: no student sits more than three time-adjacent lessons
//! of the same subject.

use chrono::{Duration, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};

use crate::data::{StudentId, SubjectId};

/// Longest allowed run of adjacent same-subject lessons for one student.
pub const MAX_CONSECUTIVE_LESSONS: usize = 3;

/// Start instants of committed lessons per (student, subject).
#[derive(Debug, Clone)]
pub struct FatigueChecker {
    stride: Duration,
    starts: BTreeMap<(StudentId, SubjectId), BTreeSet<NaiveDateTime>>,
}

impl FatigueChecker {
    /// `stride` is the start-to-start distance of two adjacent slots.
    pub fn new(stride: Duration) -> Self {
        Self {
            stride,
            starts: BTreeMap::new(),
        }
    }

    /// Length of the run the candidate would form, itself included.
    pub fn run_length_with(&self, student: StudentId, subject: SubjectId, start: NaiveDateTime) -> usize {
        let Some(starts) = self.starts.get(&(student, subject)) else {
            return 1;
        };
        let before = (1..)
            .take_while(|&k| starts.contains(&(start - self.stride * k)))
            .count();
        let after = (1..)
            .take_while(|&k| starts.contains(&(start + self.stride * k)))
            .count();
        1 + before + after
    }

    pub fn allows(&self, student: StudentId, subject: SubjectId, start: NaiveDateTime) -> bool {
        self.run_length_with(student, subject, start) <= MAX_CONSECUTIVE_LESSONS
    }

    pub fn record(&mut self, student: StudentId, subject: SubjectId, start: NaiveDateTime) {
        self.starts.entry((student, subject)).or_default().insert(start);
    }
}
