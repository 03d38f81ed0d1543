//! In-process cache for derived announcement values.
//!
//! Reads of an absent entry are a defined "no data yet" state; handlers
//! surface it as an empty-string payload, never as an error.

use dashmap::DashMap;
use std::sync::Arc;

/// Cache key for the nearly-sold-out announcement.
pub const RECENT_ANNOUNCEMENTS_KEY: &str = "RECENT_ANNOUNCEMENTS";

/// Cache key for the featured speaker string.
pub const FEATURED_SPEAKER_KEY: &str = "FEATURED_SPEAKER";

/// Shared key/value cache.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: Arc<DashMap<String, String>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value; `None` when the entry is absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }
}
