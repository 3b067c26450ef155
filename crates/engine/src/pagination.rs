use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Rejected pagination input. Checked at the request boundary, the engine
/// itself assumes `page >= 1` and `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page must be at least 1")]
    ZeroPage,
    #[error("limit must be at least 1")]
    ZeroLimit,
}

/// Page metadata returned with every search.
///
/// Indexes are 1-based and inclusive; both are 0 when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub limit: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub start_index: usize,
    pub end_index: usize,
}

impl Pagination {
    pub fn validate(page: usize, limit: usize) -> Result<(), PageError> {
        if page == 0 {
            return Err(PageError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageError::ZeroLimit);
        }
        Ok(())
    }

    /// Metadata for a request that matched nothing.
    pub fn empty(page: usize, limit: usize) -> Self {
        Self {
            current_page: page,
            limit,
            ..Self::default()
        }
    }

    /// `total_count` comes from the count phase, `page_len` is the number of
    /// documents actually returned. The two can disagree when the fetch cap
    /// truncated a partition.
    pub fn compute(total_count: usize, page: usize, limit: usize, page_len: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let offset = (page - 1).saturating_mul(limit);
        let total_pages = total_count.div_ceil(limit);

        Self {
            current_page: page,
            total_pages,
            total_count,
            limit,
            has_next: page < total_pages,
            has_prev: page > 1,
            start_index: if total_count > 0 { offset.saturating_add(1) } else { 0 },
            end_index: offset.saturating_add(page_len).min(total_count),
        }
    }
}

/// Slice bounds of page `page` within `len` sorted items.
pub fn page_range(len: usize, page: usize, limit: usize) -> Range<usize> {
    let offset = page.max(1).saturating_sub(1).saturating_mul(limit.max(1));
    let start = offset.min(len);
    let end = offset.saturating_add(limit.max(1)).min(len);
    start..end
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
