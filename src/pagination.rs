//! Page-offset arithmetic for search cursors.
//!
//! A search first returns every matching ID plus the gateway's page size.
//! Page `n` (1-based) covers IDs `[(n-1) * page_size, min(n * page_size, total))`.
//! An empty range is terminal: there is nothing left to fetch.

use std::ops::Range;

/// Slice bounds of the 1-based `page` over `total` IDs.
///
/// Returns `None` when the page is past the end, when `page` is 0, when
/// `page_size` is 0, or when the offset does not fit in `usize`.
pub fn page_bounds(page: usize, page_size: usize, total: usize) -> Option<Range<usize>> {
    let start = page.checked_sub(1)?.checked_mul(page_size)?;
    let end = start.saturating_add(page_size).min(total);
    (start < end).then_some(start..end)
}

/// Number of pages needed to cover `total` IDs.
pub fn page_count(page_size: usize, total: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}
