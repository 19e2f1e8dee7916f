//! Pagination helper: (page, limit) query parameters to (offset, limit),
//! plus the list-response envelope.

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Query-string pagination parameters. Both fields are optional; out-of-range
/// values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// 1-based page number, clamped to at least 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to 1..=100.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Row offset for the current page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// List-response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            data,
            meta: PaginationMeta {
                total,
                page: params.page(),
                limit,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PaginationParams {
        PaginationParams { page, limit }
    }

    #[test]
    fn defaults_to_first_page_of_ten() {
        let p = params(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_advances_with_page() {
        let p = params(Some(3), Some(25));
        assert_eq!(p.offset(), 50);
        assert_eq!(p.limit(), 25);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let p = params(Some(0), Some(0));
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);

        let p = params(Some(-5), Some(1000));
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn envelope_computes_page_count() {
        let p = params(Some(2), Some(10));
        let env = Paginated::new(vec![1, 2, 3], 23, &p);
        assert_eq!(env.meta.total, 23);
        assert_eq!(env.meta.total_pages, 3);
        assert_eq!(env.meta.page, 2);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let p = params(None, None);
        let env: Paginated<i64> = Paginated::new(vec![], 0, &p);
        assert_eq!(env.meta.total_pages, 0);
    }
}
