//! Schedule domain
//!
//! Recurrence rules and the predicate deciding whether a scheduled post is
//! due at a given instant.

mod entity;

pub use entity::{matches_time_of_day, Schedule, ScheduleKind};
