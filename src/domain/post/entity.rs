//! Post entity and set-once posting timestamps

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::storage::{GeneratedKeyEntity, StorageEntity};

/// A post queued for an account. Keyed by a UUID generated on first save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    /// Social account id the post belongs to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_1: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_2: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_3: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_4: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub with_files: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub checked: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub count: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_url: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_schedule: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_delete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_posted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

/// Identifiers needed to fetch a post and its account back from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLookup {
    pub account_id: String,
    pub post_id: String,
}

impl Post {
    pub fn new(account_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: account_id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn last_posted_at(&self) -> Option<DateTime<Utc>> {
        self.last_posted_at
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Records the first posting time. Returns false if it was already set.
    pub fn set_last_posted_at(&mut self, now: DateTime<Utc>) -> bool {
        if self.last_posted_at.is_some() {
            return false;
        }
        self.last_posted_at = Some(now);
        true
    }

    /// Records the creation time. Returns false if it was already set.
    pub fn set_created_at(&mut self, now: DateTime<Utc>) -> bool {
        if self.created_at.is_some() {
            return false;
        }
        self.created_at = Some(now);
        true
    }

    /// True once more than `minutes` have elapsed since the last posting.
    /// A post that was never posted is always past.
    pub fn is_past_last_posted_at(&self, minutes: i64, now: DateTime<Utc>) -> bool {
        match self.last_posted_at {
            Some(posted) => posted < now - Duration::minutes(minutes),
            None => true,
        }
    }

    pub fn lookup(&self) -> PostLookup {
        PostLookup {
            account_id: self.id.clone(),
            post_id: self.uuid.clone(),
        }
    }

    /// Attached media paths, skipping empty slots
    pub fn files(&self) -> impl Iterator<Item = &str> {
        [&self.file_1, &self.file_2, &self.file_3, &self.file_4]
            .into_iter()
            .map(String::as_str)
            .filter(|f| !f.is_empty())
    }
}

impl StorageEntity for Post {
    const COLLECTION: &'static str = "posts";

    fn key(&self) -> &str {
        &self.uuid
    }
}

impl GeneratedKeyEntity for Post {
    fn assign_key(&mut self, key: String) {
        self.uuid = key;
        self.set_created_at(Utc::now());
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}
