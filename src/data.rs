use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::GridConfig;
use crate::report::UnmetDemand;

// Type aliases for clarity
pub type StudentId = u64;
pub type TeacherId = u64;
pub type SubjectId = u64;
pub type ClassroomId = u64;
pub type Level = u32;

/// Remaining weekly lessons per student, per subject.
pub type DemandMap = BTreeMap<StudentId, BTreeMap<SubjectId, u32>>;

/// A student and the subjects they need instruction in.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub level: Level,
    pub needed_subject_ids: Vec<SubjectId>,
}

/// A teacher with daily working hours and the subjects they may teach.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub taught_subject_ids: Vec<SubjectId>,
}

/// A subject at a given level with its weekly instruction time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub level: Level,
    pub weekly_minutes: u32,
}

/// Represents a physical classroom with a given capacity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub capacity: u32,
}

/// The complete input for one scheduling run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInput {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub classrooms: Vec<Classroom>,
    /// First school day of the week. The service fills in the current
    /// week's Monday when absent.
    #[serde(default)]
    pub week_start: Option<NaiveDate>,
    #[serde(default)]
    pub options: GridConfig,
    #[serde(default)]
    pub skip_validation: bool,
}

/// One committed lesson.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledLesson {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub classroom_id: ClassroomId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub student_ids: Vec<StudentId>,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub lessons_placed: usize,
    pub lessons_still_required: u32,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingOutput {
    pub lessons: Vec<ScheduledLesson>,
    pub demand: DemandMap,
    pub unmet_demand: Vec<UnmetDemand>,
    /// Human-readable unmet-demand report, `None` when every requirement was met.
    pub problems: Option<String>,
    pub summary: ScheduleSummary,
}

impl SchedulingOutput {
    pub fn is_complete(&self) -> bool {
        self.unmet_demand.is_empty()
    }
}
