// src/aggregate/types.rs
use serde::{Deserialize, Serialize};

/// Source bucket a feed belongs to. Output composition is balanced
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Local,
    Global,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Local => "local",
            Region::Global => "global",
        }
    }
}

/// One normalized news entry. Constructed once during parsing; the
/// pipeline only filters, sorts, and regroups — never mutates in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub region: Region,
    /// Originating feed URL.
    pub source_url: String,
    /// Entity-decoded headline.
    pub title: String,
    /// Canonical article URL; doubles as the dedup key. Items with an
    /// empty link never survive deduplication.
    pub link: String,
    /// Plain-text description, capped at 450 characters.
    pub summary: String,
    /// Original published-date text, possibly empty.
    pub pub_date: String,
    /// Epoch milliseconds parsed from `pub_date`, or fetch-time "now"
    /// when absent or unparsable.
    pub ts: i64,
}
