//! Account-wide posting rule

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::post::Post;
use crate::domain::schedule::matches_time_of_day;
use crate::domain::storage::StorageEntity;

/// Posting settings applied to all of an account's posts.
/// Rule times take precedence over per-post daily schedule times.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    /// Temporarily stops all posting for the account
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_disabled: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_immediate: bool,
    /// When several scheduled posts fall on the same time, post all of them
    /// instead of only one
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_schedule_all_posts: bool,
    /// Hours to wait after a post's last posting before it is eligible again
    #[serde(default, skip_serializing_if = "is_zero")]
    pub term_hours: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub times: Vec<NaiveTime>,
}

impl Rule {
    pub fn is_active(&self) -> bool {
        !self.is_disabled
    }

    /// True if posting is enabled and `now` falls on one of the rule's times
    pub fn is_posting_time<T: Datelike + Timelike>(&self, now: &T) -> bool {
        self.is_active() && matches_time_of_day(&self.times, now)
    }

    /// True if the post's waiting term has passed
    pub fn is_term_elapsed(&self, post: &Post, now: DateTime<Utc>) -> bool {
        post.is_past_last_posted_at(self.term_hours * 60, now)
    }
}

impl StorageEntity for Rule {
    const COLLECTION: &'static str = "rules";

    fn key(&self) -> &str {
        &self.uuid
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, h, m, 0).unwrap()
    }

    fn rule() -> Rule {
        Rule {
            uuid: "rule-1".to_string(),
            term_hours: 24,
            times: vec![NaiveTime::from_hms_opt(7, 30, 0).unwrap()],
            ..Default::default()
        }
    }

    #[test]
    fn test_is_posting_time() {
        let r = rule();

        assert!(r.is_posting_time(&at(13, 7, 30)));
        assert!(!r.is_posting_time(&at(13, 7, 31)));
    }

    #[test]
    fn test_disabled_rule_never_posts() {
        let mut r = rule();
        r.is_disabled = true;

        assert!(!r.is_posting_time(&at(13, 7, 30)));
    }

    #[test]
    fn test_is_term_elapsed() {
        let r = rule();
        let mut post = Post::new("x-1", "hello");

        assert!(r.is_term_elapsed(&post, at(13, 7, 30)));

        post.set_last_posted_at(at(13, 7, 30));
        assert!(!r.is_term_elapsed(&post, at(14, 7, 30)));
        assert!(r.is_term_elapsed(&post, at(14, 7, 31)));
    }
}
