use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

use crate::error::SolveError;

/// Upper bound for lesson length, break length and slots per day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Shape of the weekly slot grid and placement options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub lesson_minutes: u32,
    pub break_minutes: u32,
    pub slots_per_day: u32,
    pub school_days: u32,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    /// Cap each lesson's attendees at the classroom's capacity.
    pub enforce_capacity: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lesson_minutes: 45,
            break_minutes: 10,
            slots_per_day: 10,
            school_days: 5,
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            enforce_capacity: false,
        }
    }
}

impl GridConfig {
    pub fn lesson_length(&self) -> Duration {
        Duration::minutes(i64::from(self.lesson_minutes))
    }

    /// Distance between the starts of two consecutive slots.
    pub fn slot_stride(&self) -> Duration {
        Duration::minutes(i64::from(self.lesson_minutes) + i64::from(self.break_minutes))
    }

    /// Lessons needed to cover `weekly_minutes`, rounded up.
    pub fn lessons_for(&self, weekly_minutes: u32) -> u32 {
        weekly_minutes.div_ceil(self.lesson_minutes)
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        if self.lesson_minutes == 0 {
            return Err(SolveError::InvalidGrid("lesson length must be positive".into()));
        }
        if self.slots_per_day == 0 {
            return Err(SolveError::InvalidGrid("at least one slot per day is required".into()));
        }
        for (name, value) in [
            ("lesson length", self.lesson_minutes),
            ("break length", self.break_minutes),
            ("slots per day", self.slots_per_day),
        ] {
            if value > MINUTES_PER_DAY {
                return Err(SolveError::InvalidGrid(format!(
                    "{name} must not exceed {MINUTES_PER_DAY}, got {value}"
                )));
            }
        }
        if !(1..=7).contains(&self.school_days) {
            return Err(SolveError::InvalidGrid(format!(
                "school days must be between 1 and 7, got {}",
                self.school_days
            )));
        }
        if self.day_start >= self.day_end {
            return Err(SolveError::InvalidGrid(format!(
                "day start {} is not before day end {}",
                self.day_start, self.day_end
            )));
        }
        Ok(())
    }
}

/// HTTP service settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_concurrent_solves: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_concurrent_solves: 4,
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT` and `MAX_CONCURRENT_SOLVES`, falling back to defaults
    /// for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            max_concurrent_solves: env::var("MAX_CONCURRENT_SOLVES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_concurrent_solves),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
