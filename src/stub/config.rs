//! Fixture store for the stub comments service
//!
//! Fixtures are raw JSON values keyed by id; the stub echoes them back
//! without interpreting anything beyond the fields it matches on. Tests
//! replace whole sections at a time via `PUT /set_config`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default page size for a user's active-threads listing.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Default response window for a thread's children.
pub const DEFAULT_RESP_LIMIT: usize = 10_000;

/// The canned data the stub serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubConfig {
    /// Discussion threads by thread id
    #[serde(default)]
    pub threads: HashMap<String, Value>,
    /// Comments by comment id
    #[serde(default)]
    pub comments: HashMap<String, Value>,
    /// A user's active threads; the profile endpoint 404s until this is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_threads: Option<Vec<Value>>,
}

/// A partial store update: each present section replaces the current one.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigUpdate {
    pub threads: Option<HashMap<String, Value>>,
    pub comments: Option<HashMap<String, Value>>,
    pub active_threads: Option<Vec<Value>>,
}

impl StubConfig {
    /// Apply an update, replacing each section it carries.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(threads) = update.threads {
            self.threads = threads;
        }
        if let Some(comments) = update.comments {
            self.comments = comments;
        }
        if let Some(active_threads) = update.active_threads {
            self.active_threads = Some(active_threads);
        }
    }
}

/// One page of a fixture collection.
#[derive(Debug, PartialEq)]
pub struct Page {
    pub collection: Vec<Value>,
    pub page: usize,
    pub num_pages: i64,
}

/// Slice `items` into the requested page.
///
/// `num_pages` keeps the real backend's exact formula, integer division
/// included, so paging clients see the same totals they would against the
/// live service. A `per_page` of zero is treated as one.
pub fn paginate(items: &[Value], page: usize, per_page: usize) -> Page {
    let per_page = per_page.max(1);
    let num_pages = (items.len() as i64 - 1).max(1) / per_page as i64 + 1;

    let start = page
        .saturating_sub(1)
        .saturating_mul(per_page)
        .min(items.len());
    let end = start.saturating_add(per_page).min(items.len());

    Page {
        collection: items[start..end].to_vec(),
        page,
        num_pages,
    }
}

/// Response-window slice used for a thread's children.
pub fn window(items: &[Value], skip: usize, limit: usize) -> Vec<Value> {
    let start = skip.min(items.len());
    let end = skip.saturating_add(limit).min(items.len());
    items[start..end].to_vec()
}
