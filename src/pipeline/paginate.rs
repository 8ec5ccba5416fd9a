//! Pagination of filtered results

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on the requested page; empty when the page is out of range
    pub items: Vec<T>,
    /// The 1-indexed page that was requested
    pub page: usize,
    /// Always at least 1, even for an empty result set
    pub total_pages: usize,
    /// Number of records across all pages
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Whether `page` lies within `1..=total_pages`
    pub fn is_in_range(&self) -> bool {
        (1..=self.total_pages).contains(&self.page)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Number of pages for `len` records, at least 1
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Slices out the 1-indexed `page` of `records`
///
/// Out-of-range pages (including 0) are not clamped: they produce an empty
/// page, and callers compare against `total_pages` to detect them. A page
/// size of 0 puts everything on a single page.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_pages = total_pages(records.len(), page_size);
    let page_size = if page_size == 0 {
        records.len()
    } else {
        page_size
    };

    let items = if page == 0 {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(page_size);
        records
            .iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect()
    };

    Page {
        items,
        page,
        total_pages,
        total_items: records.len(),
    }
}
