//! Helpers the table footer needs to render server-driven pagination.

use serde::Serialize;

/// Number of pages needed to show `total_docs` rows, `limit` at a time.
pub fn page_count(total_docs: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    total_docs.div_ceil(limit)
}

/// "Showing {from} to {to} of {total} entries".
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PageSummary {
    pub from: usize,
    pub to: usize,
    pub total: usize,
}

impl PageSummary {
    /// `rows` is the number of rows actually returned for `page`.
    pub fn new(page: usize, limit: usize, total: usize, rows: usize) -> Self {
        let from = if rows > 0 {
            page.saturating_sub(1) * limit + 1
        } else {
            0
        };
        Self {
            from,
            to: (page * limit).min(total),
            total,
        }
    }
}

/// Which navigation buttons the footer enables.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PageNavigation {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
    /// Page count shown in "Page x of y"; never zero.
    pub shown_page_count: usize,
}

impl PageNavigation {
    pub fn new(page: usize, page_count: usize) -> Self {
        let back = page > 1;
        let forward = page < page_count;
        Self {
            first: back,
            previous: back,
            next: forward,
            last: forward,
            shown_page_count: page_count.max(1),
        }
    }
}
