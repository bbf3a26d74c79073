//! # sx_types
//!
//! Wire types shared by the Stack Exchange search client and the ranking core

use serde::Deserialize;
use serde::Serialize;

/// A single search result (question) as returned by the search endpoint
///
/// `is_answered` is only serialized when true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_answered: bool,
    pub view_count: u64,
    pub creation_date: i64, // Seconds since epoch
    pub question_id: u64,
    pub link: String,
}

impl Item {
    pub fn new(question_id: u64, view_count: u64, creation_date: i64, link: impl Into<String>) -> Self {
        Self { is_answered: false, view_count, creation_date, question_id, link: link.into() }
    }

    /// Mark the item as answered
    pub fn answered(mut self) -> Self {
        self.is_answered = true;
        self
    }
}

#[inline]
fn is_false(value: &bool) -> bool {
    !*value
}

/// API quota metadata reported with every page
///
/// Informational only, never used for control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    #[serde(default)]
    pub quota_max: u32,
    #[serde(default)]
    pub quota_remaining: u32,
}

impl Quota {
    /// Number of calls consumed against the daily quota
    pub fn used(&self) -> u32 {
        self.quota_max.saturating_sub(self.quota_remaining)
    }
}

/// One decoded page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Item>,
    pub has_more: bool,
    #[serde(flatten)]
    pub quota: Quota,
    /// Seconds the API asks clients to wait before hitting the same method again
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff: Option<u64>,
}

impl Page {
    pub fn new(items: Vec<Item>, has_more: bool) -> Self {
        Self { items, has_more, quota: Quota::default(), backoff: None }
    }

    pub fn with_quota(mut self, quota_max: u32, quota_remaining: u32) -> Self {
        self.quota = Quota { quota_max, quota_remaining };
        self
    }
}
