//! Offset pagination helpers for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for paginated endpoints.
const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for paginated endpoints.
const MAX_LIMIT: i64 = 100;

/// Query parameters for offset-paginated endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PageQuery {
    /// Page number (1-indexed, default: 1).
    pub page: Option<i64>,

    /// Items per page (default: 10, max: 100).
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Get the page number (1-indexed).
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page (clamped to 1-100).
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Get the row offset for the current page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata included in paginated responses.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PageInfo {
    /// Build pagination metadata from a query and total row count.
    pub fn new(query: &PageQuery, total: i64) -> Self {
        let limit = query.limit();
        Self {
            page: query.page(),
            limit,
            total,
            pages: if total == 0 {
                0
            } else {
                (total + limit - 1) / limit
            },
        }
    }
}
