//! Recurrence rules for scheduled posts

use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::storage::StorageEntity;

/// How often a schedule repeats. Persisted as a small integer (0 = None .. 4 = Daily).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ScheduleKind {
    #[default]
    None,
    Yearly,
    Monthly,
    Weekly,
    Daily,
    /// A persisted value this version does not know; never due
    Unknown(i64),
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Daily => "daily",
            Self::None | Self::Unknown(_) => "none",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<i64> for ScheduleKind {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Yearly,
            2 => Self::Monthly,
            3 => Self::Weekly,
            4 => Self::Daily,
            other => Self::Unknown(other),
        }
    }
}

impl From<ScheduleKind> for i64 {
    fn from(kind: ScheduleKind) -> Self {
        match kind {
            ScheduleKind::None => 0,
            ScheduleKind::Yearly => 1,
            ScheduleKind::Monthly => 2,
            ScheduleKind::Weekly => 3,
            ScheduleKind::Daily => 4,
            ScheduleKind::Unknown(value) => value,
        }
    }
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scheduling rule attached to a post.
///
/// Only the fields relevant to `type_schedule` are consulted: `month` and
/// `day` for yearly, `day` for monthly, `week` for weekly and `times` for
/// daily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_schedule: bool,
    /// Post as soon as possible, ignoring the recurrence
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_immediate: bool,
    #[serde(default, skip_serializing_if = "ScheduleKind::is_none")]
    pub type_schedule: ScheduleKind,
    /// Month of the year, 1-12; 0 means unset
    #[serde(default, skip_serializing_if = "is_zero")]
    pub month: u32,
    /// Day of the month, 1-31
    #[serde(default, skip_serializing_if = "is_zero")]
    pub day: u32,
    /// Day of the week, persisted as 0 (Sunday) .. 6 (Saturday)
    #[serde(
        default = "sunday",
        skip_serializing_if = "is_sunday",
        with = "weekday_number"
    )]
    pub week: Weekday,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub times: Vec<NaiveTime>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            post_id: String::new(),
            owner_id: String::new(),
            is_schedule: false,
            is_immediate: false,
            type_schedule: ScheduleKind::None,
            month: 0,
            day: 0,
            week: Weekday::Sun,
            times: Vec::new(),
        }
    }
}

impl Schedule {
    pub fn yearly(month: u32, day: u32) -> Self {
        Self {
            type_schedule: ScheduleKind::Yearly,
            month,
            day,
            ..Default::default()
        }
    }

    pub fn monthly(day: u32) -> Self {
        Self {
            type_schedule: ScheduleKind::Monthly,
            day,
            ..Default::default()
        }
    }

    pub fn weekly(week: Weekday) -> Self {
        Self {
            type_schedule: ScheduleKind::Weekly,
            week,
            ..Default::default()
        }
    }

    pub fn daily(times: Vec<NaiveTime>) -> Self {
        Self {
            type_schedule: ScheduleKind::Daily,
            times,
            ..Default::default()
        }
    }

    pub fn for_post(mut self, post_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        self.post_id = post_id.into();
        self.owner_id = owner_id.into();
        self.is_schedule = true;
        self
    }

    /// Whether the rule fires at `now`.
    ///
    /// Yearly, monthly and weekly rules match the whole calendar day; daily
    /// rules match to the minute. Works on any chrono date-time, so the
    /// caller decides which time zone the calendar is read in.
    pub fn is_due<T: Datelike + Timelike>(&self, now: &T) -> bool {
        match self.type_schedule {
            ScheduleKind::Yearly => {
                self.month != 0 && now.month() == self.month && now.day() == self.day
            }
            ScheduleKind::Monthly => now.day() == self.day,
            ScheduleKind::Weekly => now.weekday() == self.week,
            ScheduleKind::Daily => matches_time_of_day(&self.times, now),
            ScheduleKind::None | ScheduleKind::Unknown(_) => false,
        }
    }
}

impl StorageEntity for Schedule {
    const COLLECTION: &'static str = "schedules";

    fn key(&self) -> &str {
        &self.post_id
    }
}

/// True if any entry shares `now`'s hour and minute. Seconds are ignored.
pub fn matches_time_of_day<T: Timelike>(times: &[NaiveTime], now: &T) -> bool {
    times
        .iter()
        .any(|t| t.hour() == now.hour() && t.minute() == now.minute())
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn sunday() -> Weekday {
    Weekday::Sun
}

fn is_sunday(day: &Weekday) -> bool {
    *day == Weekday::Sun
}

mod weekday_number {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(day.num_days_from_sunday() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Weekday::Sun),
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            other => Err(D::Error::custom(format!("invalid weekday: {}", other))),
        }
    }
}
