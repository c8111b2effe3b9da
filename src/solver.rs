use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info, trace};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::availability::{self, Bookings, EligibilityView};
use crate::data::{
    Classroom, ScheduleSummary, ScheduledLesson, SchedulingInput, SchedulingOutput, StudentId,
    Subject, SubjectId, Teacher,
};
use crate::error::SolveError;
use crate::fatigue::FatigueChecker;
use crate::grid;
use crate::index::{CapabilityIndex, DemandTracker};
use crate::interval::TimeInterval;
use crate::report;

/// Builds the week's timetable for `input.week_start`, or for the current
/// week when no start date is given.
pub fn solve(input: &SchedulingInput) -> Result<SchedulingOutput, SolveError> {
    let week_start = input.week_start.unwrap_or_else(grid::current_week_start);
    solve_week(input, week_start)
}

/// Greedy single-pass placement over classrooms x slots.
///
/// Classrooms are visited largest first; each classroom walks the slot grid in
/// chronological order and receives at most one lesson per slot: the first
/// (teacher, subject) pair, by ascending ids, that has at least one eligible
/// student wins. Nothing is ever revisited.
pub fn solve_week(
    input: &SchedulingInput,
    week_start: NaiveDate,
) -> Result<SchedulingOutput, SolveError> {
    let start_time = Instant::now();
    ensure_present(input)?;
    input.options.validate()?;

    let slots = grid::candidate_slots(week_start, &input.options);
    if slots.is_empty() {
        return Err(SolveError::InvalidGrid(
            "no lesson fits between day start and day end".into(),
        ));
    }

    let mut scheduler = GreedyScheduler::new(input)?;
    info!(
        "Scheduling {} students, {} teachers, {} subjects across {} classrooms x {} slots; {} lessons required.",
        input.students.len(),
        input.teachers.len(),
        input.subjects.len(),
        input.classrooms.len(),
        slots.len(),
        scheduler.demand.total_remaining()
    );

    scheduler.run(&slots);
    let output = scheduler.finish();

    info!(
        "Placed {} lessons in {:.2?}; {} lessons still required.",
        output.summary.lessons_placed,
        start_time.elapsed(),
        output.summary.lessons_still_required
    );
    if !output.unmet_demand.is_empty() {
        info!("{} students have unmet demand.", output.unmet_demand.len());
    }
    Ok(output)
}

fn ensure_present(input: &SchedulingInput) -> Result<(), SolveError> {
    let collections: [(&'static str, Vec<u64>); 4] = [
        ("classrooms", input.classrooms.iter().map(|c| c.id).collect()),
        ("teachers", input.teachers.iter().map(|t| t.id).collect()),
        ("subjects", input.subjects.iter().map(|s| s.id).collect()),
        ("students", input.students.iter().map(|s| s.id).collect()),
    ];
    for (collection, ids) in collections {
        if ids.is_empty() {
            return Err(SolveError::EmptyInput { collection });
        }
        let mut seen = BTreeSet::new();
        if let Some(&id) = ids.iter().find(|&&id| !seen.insert(id)) {
            return Err(SolveError::DuplicateId { collection, id });
        }
    }
    Ok(())
}

/// Run state. Lives for exactly one call of [`solve_week`].
struct GreedyScheduler<'a> {
    input: &'a SchedulingInput,
    subjects: BTreeMap<SubjectId, &'a Subject>,
    // ascending by id, the pair enumeration order
    teachers: Vec<&'a Teacher>,
    capabilities: CapabilityIndex,
    demand: DemandTracker,
    bookings: Bookings,
    fatigue: FatigueChecker,
    lessons: Vec<ScheduledLesson>,
}

impl<'a> GreedyScheduler<'a> {
    fn new(input: &'a SchedulingInput) -> Result<Self, SolveError> {
        // lookups
        let subjects: BTreeMap<SubjectId, &Subject> =
            input.subjects.iter().map(|s| (s.id, s)).collect();
        let teachers = input.teachers.iter().sorted_by_key(|t| t.id).collect();
        let capabilities = CapabilityIndex::build(&input.teachers, &subjects);
        let demand = DemandTracker::build(&input.students, &subjects, &input.options)?;

        Ok(Self {
            input,
            subjects,
            teachers,
            capabilities,
            demand,
            bookings: Bookings::default(),
            fatigue: FatigueChecker::new(input.options.slot_stride()),
            lessons: Vec::new(),
        })
    }

    fn run(&mut self, slots: &[TimeInterval]) {
        let input = self.input;
        // stable: equal capacities keep their input order
        let classrooms = input
            .classrooms
            .iter()
            .sorted_by(|a, b| b.capacity.cmp(&a.capacity));

        for classroom in classrooms {
            let mut placed = 0;
            // ids are unique and each classroom is walked once, so its slots are all free here
            for slot in slots {
                if self.try_place(classroom, *slot) {
                    placed += 1;
                }
            }
            debug!(
                "Classroom {} (capacity {}) received {} lessons.",
                classroom.id, classroom.capacity, placed
            );
        }
    }

    /// Places at most one lesson in `classroom` at `slot`. Returns whether it did.
    fn try_place(&mut self, classroom: &Classroom, slot: TimeInterval) -> bool {
        let available = availability::available_teachers(&self.teachers, &self.bookings, &slot);
        let pairs = availability::candidate_pairs(&available, &self.capabilities, &self.subjects);

        for (subject, teacher) in pairs {
            let attendees = self.attendees(classroom, subject, &slot);
            if attendees.is_empty() {
                continue;
            }
            self.commit(classroom, slot, teacher, subject, attendees);
            return true;
        }
        false
    }

    fn attendees(&self, classroom: &Classroom, subject: &Subject, slot: &TimeInterval) -> Vec<StudentId> {
        let view = EligibilityView {
            demand: &self.demand,
            bookings: &self.bookings,
            fatigue: &self.fatigue,
        };
        let eligible = view.eligible_students(&self.input.students, subject, slot);
        let take = if self.input.options.enforce_capacity {
            classroom.capacity as usize
        } else {
            eligible.len()
        };
        eligible.iter().take(take).map(|s| s.id).collect()
    }

    fn commit(
        &mut self,
        classroom: &Classroom,
        slot: TimeInterval,
        teacher: &Teacher,
        subject: &Subject,
        student_ids: Vec<StudentId>,
    ) {
        self.bookings.teachers.book(teacher.id, slot);
        for &student in &student_ids {
            self.bookings.students.book(student, slot);
            self.demand.decrement(student, subject.id);
            self.fatigue.record(student, subject.id, slot.start);
        }
        trace!(
            "Placed subject {} with teacher {} in classroom {} at {} for {} students.",
            subject.id,
            teacher.id,
            classroom.id,
            slot.start,
            student_ids.len()
        );
        self.lessons.push(ScheduledLesson {
            start: slot.start,
            end: slot.end,
            classroom_id: classroom.id,
            teacher_id: teacher.id,
            subject_id: subject.id,
            student_ids,
        });
    }

    fn finish(self) -> SchedulingOutput {
        let unmet_demand = report::unmet_demand(self.demand.as_map());
        let problems = report::problems(&unmet_demand);
        let summary = ScheduleSummary {
            lessons_placed: self.lessons.len(),
            lessons_still_required: self.demand.total_remaining(),
        };
        SchedulingOutput {
            lessons: self.lessons,
            demand: self.demand.into_map(),
            unmet_demand,
            problems,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::data::{Classroom, Student};
    use chrono::NaiveTime;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn base_input() -> SchedulingInput {
        SchedulingInput {
            students: vec![
                Student { id: 1, level: 1, needed_subject_ids: vec![100] },
                Student { id: 2, level: 1, needed_subject_ids: vec![100] },
            ],
            teachers: vec![Teacher {
                id: 10,
                work_start: time(8, 0),
                work_end: time(17, 0),
                taught_subject_ids: vec![100],
            }],
            subjects: vec![Subject { id: 100, level: 1, weekly_minutes: 90 }],
            classrooms: vec![Classroom { id: 1000, capacity: 30 }],
            week_start: Some(monday()),
            ..SchedulingInput::default()
        }
    }

    #[test]
    fn empty_collections_are_fatal() {
        let mut input = base_input();
        input.classrooms.clear();
        assert_eq!(
            solve_week(&input, monday()).unwrap_err(),
            SolveError::EmptyInput { collection: "classrooms" }
        );

        let mut input = base_input();
        input.students.clear();
        assert_eq!(
            solve_week(&input, monday()).unwrap_err(),
            SolveError::EmptyInput { collection: "students" }
        );
    }

    #[test]
    fn duplicate_ids_are_fatal() {
        let mut input = base_input();
        input.students[1].id = 1;
        assert_eq!(
            solve_week(&input, monday()).unwrap_err(),
            SolveError::DuplicateId { collection: "students", id: 1 }
        );

        let mut input = base_input();
        input.classrooms.push(Classroom { id: 1000, capacity: 5 });
        assert_eq!(
            solve_week(&input, monday()).unwrap_err(),
            SolveError::DuplicateId { collection: "classrooms", id: 1000 }
        );
    }

    #[test]
    fn oversized_break_is_rejected_before_building_slots() {
        let mut input = base_input();
        input.options = GridConfig {
            break_minutes: u32::MAX,
            slots_per_day: 100,
            ..GridConfig::default()
        };
        assert!(matches!(solve_week(&input, monday()), Err(SolveError::InvalidGrid(_))));
    }

    #[test]
    fn unusable_grid_is_fatal() {
        let mut input = base_input();
        input.options = GridConfig {
            day_start: time(8, 0),
            day_end: time(8, 30),
            ..GridConfig::default()
        };
        assert!(matches!(solve_week(&input, monday()), Err(SolveError::InvalidGrid(_))));
    }

    #[test]
    fn fills_first_slots_of_largest_classroom_first() {
        let mut input = base_input();
        input.classrooms = vec![
            Classroom { id: 1, capacity: 10 },
            Classroom { id: 2, capacity: 40 },
        ];
        let output = solve_week(&input, monday()).unwrap();

        assert_eq!(output.lessons.len(), 2);
        assert!(output.lessons.iter().all(|l| l.classroom_id == 2));
        assert!(output.is_complete());
    }

    #[test]
    fn equal_capacity_keeps_input_order() {
        let mut input = base_input();
        input.classrooms = vec![
            Classroom { id: 7, capacity: 20 },
            Classroom { id: 3, capacity: 20 },
        ];
        let output = solve_week(&input, monday()).unwrap();
        assert!(output.lessons.iter().all(|l| l.classroom_id == 7));
    }

    #[test]
    fn capacity_is_ignored_unless_enforced() {
        let mut input = base_input();
        input.classrooms = vec![Classroom { id: 1, capacity: 1 }];

        let output = solve_week(&input, monday()).unwrap();
        assert_eq!(output.lessons[0].student_ids, vec![1, 2]);

        input.options.enforce_capacity = true;
        let output = solve_week(&input, monday()).unwrap();
        assert!(output.lessons.iter().all(|l| l.student_ids.len() == 1));
        assert_eq!(output.lessons.len(), 4);
        assert!(output.is_complete());
    }

    #[test]
    fn zero_capacity_room_hosts_nothing_when_enforced() {
        let mut input = base_input();
        input.classrooms = vec![Classroom { id: 1, capacity: 0 }];
        input.options.enforce_capacity = true;

        let output = solve_week(&input, monday()).unwrap();
        assert!(output.lessons.is_empty());
        assert_eq!(output.summary.lessons_still_required, 4);
    }

    #[test]
    fn lower_teacher_id_wins_the_slot() {
        let mut input = base_input();
        input.teachers.push(Teacher {
            id: 5,
            work_start: time(8, 0),
            work_end: time(17, 0),
            taught_subject_ids: vec![100],
        });
        let output = solve_week(&input, monday()).unwrap();
        assert_eq!(output.lessons[0].teacher_id, 5);
    }
}
