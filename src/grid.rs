use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::config::GridConfig;
use crate::interval::TimeInterval;

/// Builds the week's candidate slots in chronological order.
///
/// Slot `k` of each day starts at `day_start + k * stride`; slots ending after
/// `day_end` (or past midnight) are dropped. Every classroom shares this grid.
pub fn candidate_slots(week_start: NaiveDate, config: &GridConfig) -> Vec<TimeInterval> {
    let mut slots = Vec::new();
    for day in 0..config.school_days {
        let Some(date) = week_start.checked_add_signed(Duration::days(i64::from(day))) else {
            break;
        };
        let day_start = date.and_time(config.day_start);
        for k in 0..config.slots_per_day {
            let offset = i32::try_from(k)
                .ok()
                .and_then(|k| config.slot_stride().checked_mul(k));
            let Some(start) = offset.and_then(|offset| day_start.checked_add_signed(offset)) else {
                break;
            };
            // later slots only move further into the next day
            if start.date() != date {
                break;
            }
            let Some(end) = start.checked_add_signed(config.lesson_length()) else {
                break;
            };
            if end.date() != date || end.time() > config.day_end {
                continue;
            }
            slots.push(TimeInterval::new(start, end));
        }
    }
    slots
}

/// Monday of the current local week.
pub fn current_week_start() -> NaiveDate {
    let today = Local::now().date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}
