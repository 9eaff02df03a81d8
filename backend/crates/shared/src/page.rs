//! Pagination envelope for list endpoints.
//!
//! All list endpoints accept `?page=&per_page=` and respond with a
//! `{ data, meta }` envelope carrying the total row count.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not specify one.
pub const DEFAULT_PER_PAGE: u32 = 12;
/// Hard cap on page size.
pub const MAX_PER_PAGE: u32 = 50;

/// Query-string pagination parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
        }
    }
}

impl PageParams {
    /// 1-based page number, clamped to at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to `1..=MAX_PER_PAGE`.
    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        self.per_page() as i64
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        ((self.page() - 1) as i64) * self.limit()
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// A single page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, params: &PageParams, total: i64) -> Self {
        let per_page = params.per_page() as i64;
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

        Self {
            data,
            meta: PageMeta {
                page: params.page(),
                per_page: params.per_page(),
                total,
                total_pages,
            },
        }
    }

    /// Map the items while keeping the meta.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let params = PageParams {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn test_offset() {
        let params = PageParams {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_total_pages() {
        let params = PageParams {
            page: Some(1),
            per_page: Some(10),
        };
        let page = Page::new(vec![1, 2, 3], &params, 21);
        assert_eq!(page.meta.total_pages, 3);

        let empty: Page<i32> = Page::new(vec![], &params, 0);
        assert_eq!(empty.meta.total_pages, 0);
    }
}
