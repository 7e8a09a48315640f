//! Session history of completed results
//!
//! Append-only, most-recent-first, display-only. Unbounded by default; an
//! explicit capacity cap can be configured, which evicts the oldest entry.

use chrono::{DateTime, Utc};
use image::RgbImage;
use std::collections::VecDeque;

/// A completed result held for display
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// The completed image at original resolution
    pub image: RgbImage,

    /// When the entry was appended
    pub created_at: DateTime<Utc>,
}

/// Append-only, most-recent-first store of completed results for one session
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    limit: Option<usize>,
}

impl HistoryStore {
    /// Create an unbounded history store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history store that keeps at most `limit` entries, evicting
    /// the oldest. `None` means unbounded.
    #[must_use]
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Append a completed image as the most recent entry
    pub fn append(&mut self, image: RgbImage) {
        self.entries.push_front(HistoryEntry {
            image,
            created_at: Utc::now(),
        });

        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_back();
            }
        }
    }

    /// Entries in most-recent-first order
    pub fn list(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Most recent entry, if any
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
