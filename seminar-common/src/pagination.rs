//! Pagination utilities for list endpoints
//!
//! Page numbers are 1-indexed. The page size is caller-selectable via the
//! `size` query parameter, clamped to [1, 100] with a default of 10.

/// Default rows per page when `size` is not given
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on caller-requested page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Resolved pagination window
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub size: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

impl Page {
    /// Resolve a page window from raw query parameters
    pub fn resolve(page: Option<i64>, size: Option<i64>) -> Self {
        let size = size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = page.unwrap_or(1).max(1);
        Self {
            page,
            size,
            offset: (page - 1) * size,
        }
    }

    /// Total number of pages for `count` rows
    pub fn total_pages(&self, count: i64) -> i64 {
        (count + self.size - 1) / self.size
    }

    /// Build next/previous links for the envelope
    pub fn links(&self, path: &str, count: i64) -> (Option<String>, Option<String>) {
        let total = self.total_pages(count);
        let next = if self.page < total {
            Some(format!("{}?page={}&size={}", path, self.page + 1, self.size))
        } else {
            None
        };
        let previous = if self.page > 1 && count > 0 {
            Some(format!("{}?page={}&size={}", path, self.page - 1, self.size))
        } else {
            None
        };
        (next, previous)
    }
}
