#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use timetable_solver::config::GridConfig;
use timetable_solver::data::{
    Classroom, ScheduledLesson, SchedulingInput, Student, StudentId, Subject, SubjectId, Teacher,
};
use timetable_solver::interval::TimeInterval;

pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 2 + day)
        .unwrap()
        .and_time(time(h, m))
}

pub fn student(id: StudentId, level: u32, needs: &[SubjectId]) -> Student {
    Student {
        id,
        level,
        needed_subject_ids: needs.to_vec(),
    }
}

pub fn teacher(id: u64, from: NaiveTime, to: NaiveTime, taught: &[SubjectId]) -> Teacher {
    Teacher {
        id,
        work_start: from,
        work_end: to,
        taught_subject_ids: taught.to_vec(),
    }
}

pub fn subject(id: SubjectId, level: u32, weekly_minutes: u32) -> Subject {
    Subject {
        id,
        level,
        weekly_minutes,
    }
}

pub fn classroom(id: u64, capacity: u32) -> Classroom {
    Classroom { id, capacity }
}

pub fn interval(lesson: &ScheduledLesson) -> TimeInterval {
    TimeInterval::new(lesson.start, lesson.end)
}

/// Lessons per (student, subject) in the produced schedule.
pub fn attended(lessons: &[ScheduledLesson]) -> BTreeMap<(StudentId, SubjectId), u32> {
    let mut counts = BTreeMap::new();
    for lesson in lessons {
        for &student in &lesson.student_ids {
            *counts.entry((student, lesson.subject_id)).or_insert(0) += 1;
        }
    }
    counts
}

/// Panics if two lessons sharing a key conflict in time.
pub fn assert_no_conflicts<K: Ord + std::fmt::Debug>(
    lessons: &[ScheduledLesson],
    keys: impl Fn(&ScheduledLesson) -> Vec<K>,
    what: &str,
) {
    let mut by_key: BTreeMap<K, Vec<TimeInterval>> = BTreeMap::new();
    for lesson in lessons {
        for key in keys(lesson) {
            by_key.entry(key).or_default().push(interval(lesson));
        }
    }
    for (key, intervals) in by_key {
        for (i, a) in intervals.iter().enumerate() {
            for b in &intervals[i + 1..] {
                assert!(!a.overlaps(b), "{what} {key:?} double-booked: {a:?} / {b:?}");
            }
        }
    }
}

/// Longest run of 55-minute-spaced lessons of one subject for one student.
pub fn longest_run(lessons: &[ScheduledLesson], grid: &GridConfig) -> usize {
    let mut starts: BTreeMap<(StudentId, SubjectId), Vec<NaiveDateTime>> = BTreeMap::new();
    for lesson in lessons {
        for &student in &lesson.student_ids {
            starts
                .entry((student, lesson.subject_id))
                .or_default()
                .push(lesson.start);
        }
    }
    let mut longest = 0;
    for mut list in starts.into_values() {
        list.sort();
        let mut run = 1;
        longest = longest.max(run);
        for pair in list.windows(2) {
            if pair[1] - pair[0] == grid.slot_stride() {
                run += 1;
            } else {
                run = 1;
            }
            longest = longest.max(run);
        }
    }
    longest
}

pub fn input(
    students: Vec<Student>,
    teachers: Vec<Teacher>,
    subjects: Vec<Subject>,
    classrooms: Vec<Classroom>,
) -> SchedulingInput {
    SchedulingInput {
        students,
        teachers,
        subjects,
        classrooms,
        week_start: Some(monday()),
        ..SchedulingInput::default()
    }
}
