use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::{DemandMap, StudentId, SubjectId};

/// One subject a student is still short of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectShortfall {
    pub subject_id: SubjectId,
    pub remaining: u32,
}

/// Everything one student is still missing after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetDemand {
    pub student_id: StudentId,
    pub subjects: Vec<SubjectShortfall>,
}

/// Collects `remaining > 0` entries, ordered by student then subject id.
pub fn unmet_demand(demand: &DemandMap) -> Vec<UnmetDemand> {
    demand
        .iter()
        .filter_map(|(student_id, needs)| {
            let subjects: Vec<SubjectShortfall> = needs
                .iter()
                .filter(|&(_, &remaining)| remaining > 0)
                .map(|(&subject_id, &remaining)| SubjectShortfall {
                    subject_id,
                    remaining,
                })
                .collect();
            (!subjects.is_empty()).then(|| UnmetDemand {
                student_id: *student_id,
                subjects,
            })
        })
        .collect()
}

/// Human-readable form of an unmet-demand list.
pub struct UnmetDemandReport<'a>(pub &'a [UnmetDemand]);

impl fmt::Display for UnmetDemandReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Unable to schedule all required lessons. Remaining requirements:")?;
        for entry in self.0 {
            writeln!(f)?;
            writeln!(f, "Student {}", entry.student_id)?;
            writeln!(f, "Missing lessons for subjects:")?;
            for shortfall in &entry.subjects {
                writeln!(
                    f,
                    "- Subject {}: {} lessons remaining",
                    shortfall.subject_id, shortfall.remaining
                )?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Possible reasons:")?;
        writeln!(f, "1. No available teachers for required subjects")?;
        writeln!(f, "2. No available classrooms")?;
        writeln!(f, "3. Time constraints (working hours, lesson duration)")
    }
}

/// `None` when nothing is missing.
pub fn problems(unmet: &[UnmetDemand]) -> Option<String> {
    (!unmet.is_empty()).then(|| UnmetDemandReport(unmet).to_string())
}
