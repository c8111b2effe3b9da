//! Weekly school timetable construction.
//!
//! Given students, teachers, subjects and classrooms, [`solver::solve`] builds a
//! conflict-free set of lessons with a greedy single pass and reports whatever
//! weekly demand it could not place. The HTTP service in [`server`] wraps it.

pub mod availability;
pub mod config;
pub mod data;
pub mod error;
pub mod fatigue;
pub mod grid;
pub mod index;
pub mod interval;
pub mod report;
pub mod server;
pub mod solver;
pub mod validation;

pub use data::{SchedulingInput, SchedulingOutput, ScheduledLesson};
pub use error::SolveError;
pub use solver::{solve, solve_week};
