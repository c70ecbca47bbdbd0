//! Thread groups: a parent post followed by its replies

use serde::{Deserialize, Serialize};

use crate::domain::storage::StorageEntity;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_post_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner_id: String,
    /// Whether the posts are published as a thread
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_on: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_post_ids: Vec<String>,
}

impl Group {
    pub fn new(parent_post_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            parent_post_id: parent_post_id.into(),
            owner_id: owner_id.into(),
            is_on: true,
            child_post_ids: Vec::new(),
        }
    }

    /// Appends a reply, ignoring duplicates and the parent itself
    pub fn push_child(&mut self, post_id: impl Into<String>) -> bool {
        let post_id = post_id.into();

        if post_id == self.parent_post_id || self.child_post_ids.contains(&post_id) {
            return false;
        }
        self.child_post_ids.push(post_id);
        true
    }
}

impl StorageEntity for Group {
    const COLLECTION: &'static str = "groups";

    fn key(&self) -> &str {
        &self.parent_post_id
    }
}
