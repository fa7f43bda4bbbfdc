//! Offset pagination window.

use serde::{Deserialize, Serialize};

/// A bounded window over the store's default row order.
///
/// Defaults to the first [`Page::DEFAULT_LIMIT`] rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    /// Number of rows returned when no limit is given.
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Number of rows skipped when no offset is given.
    pub const DEFAULT_OFFSET: u32 = 0;

    /// Build a page window of at most `limit` rows after skipping `offset`.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Maximum number of rows in this page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before this page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, Self::DEFAULT_OFFSET)
    }
}
