//! Page-based search windows and the pager attached to results.

use searchmap_core::{PaginationDefaults, SearchQuery};

/// The `pager` block of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagerParams {
    pub page: Option<i64>,
    pub per_page: Option<usize>,
    pub page_param: Option<String>,
}

/// Paging decisions made for one search, echoed back into its [`Pager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEcho {
    pub page: u64,
    pub page_param: String,
    pub limit: usize,
    pub offset: usize,
}

/// Applies `pager` to `query`.
///
/// Returns `None` (and leaves `query` untouched) when the model has no
/// pagination support or no page number was given. Pages below 1 become 1.
/// A `limit`/`offset` already on the query wins over the computed one.
pub fn resolve(
    query: &mut SearchQuery,
    pager: Option<&PagerParams>,
    defaults: Option<&PaginationDefaults>,
) -> Option<PageEcho> {
    let defaults = defaults?;
    let pager = pager?;
    let page = u64::try_from(pager.page?.max(1)).unwrap_or(1);
    let per_page = pager.per_page.filter(|n| *n > 0).unwrap_or(defaults.per_page);
    let page_param = pager.page_param.clone().unwrap_or_else(|| defaults.page_param.clone());

    let skipped_pages = usize::try_from(page - 1).unwrap_or(usize::MAX);
    let limit = *query.limit.get_or_insert(per_page);
    let offset = *query.offset.get_or_insert(skipped_pages.saturating_mul(per_page));
    tracing::trace!(page, limit, offset, "resolved pager");

    Some(PageEcho { page, page_param, limit, offset })
}

/// Read-only pagination metadata of a result collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    current_page: u64,
    per_page: usize,
    total: usize,
    page_param: String,
    offset: usize,
}

impl Pager {
    pub fn new(echo: &PageEcho, total: usize) -> Self {
        Self {
            current_page: echo.page,
            per_page: echo.limit,
            total,
            page_param: echo.page_param.clone(),
            offset: echo.offset,
        }
    }

    pub fn current_page(&self) -> u64 { self.current_page }
    pub fn per_page(&self) -> usize { self.per_page }
    pub fn total(&self) -> usize { self.total }
    pub fn page_param(&self) -> &str { &self.page_param }
    pub fn offset(&self) -> usize { self.offset }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        u64::try_from(self.total.div_ceil(self.per_page)).unwrap_or(u64::MAX)
    }

    pub fn previous_page(&self) -> Option<u64> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u64> {
        (self.current_page < self.total_pages()).then(|| self.current_page + 1)
    }

    /// True for a page past the last one; such pages come back empty.
    pub fn is_beyond_last(&self) -> bool { self.current_page > self.total_pages().max(1) }
}
