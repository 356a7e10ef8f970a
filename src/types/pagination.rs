//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// Pagination query parameters (reusable across all list endpoints)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// 1-indexed page number
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (capped at 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Page number, clamped to `1..=MAX_PAGE_NUMBER`
    pub fn page(&self) -> u64 {
        self.page.clamp(1, MAX_PAGE_NUMBER)
    }

    /// Get limit capped at maximum, never zero
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated result carried from services to handlers
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let pages = if limit > 0 { total.div_ceil(limit) } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

impl<T> Paginated<T> {
    /// Create new paginated result
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(params.page(), params.limit(), total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_rounds_up() {
        assert_eq!(PaginationMeta::new(1, 20, 21).pages, 2);
        assert_eq!(PaginationMeta::new(1, 20, 20).pages, 1);
        assert_eq!(PaginationMeta::new(1, 20, 19).pages, 1);
        assert_eq!(PaginationMeta::new(1, 20, 0).pages, 0);
        assert_eq!(PaginationMeta::new(1, 1, 7).pages, 7);
    }

    #[test]
    fn test_limit_and_offset() {
        let params = PaginationParams::new(3, 20);
        assert_eq!(params.offset(), 40);

        let capped = PaginationParams::new(1, 1000);
        assert_eq!(capped.limit(), MAX_PAGE_SIZE);

        let zeroes = PaginationParams::new(0, 0);
        assert_eq!(zeroes.page(), 1);
        assert_eq!(zeroes.limit(), 1);
        assert_eq!(zeroes.offset(), 0);
    }

    #[test]
    fn test_huge_page_keeps_offset_in_bigint_range() {
        let params = PaginationParams::new(u64::MAX, u64::MAX);
        assert_eq!(params.page(), MAX_PAGE_NUMBER);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert!(params.offset() <= i64::MAX as u64);
        assert!((params.page() * params.limit()) <= i64::MAX as u64);
    }
}
