use serde::{Deserialize, Serialize};

use crate::pagination::page_count;

/// Pagination metadata reported by a list endpoint alongside its rows.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_docs: usize,
    pub page: usize,
    pub limit: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
}

impl PaginationMeta {
    /// Builds consistent metadata for `page` of a result set with
    /// `total_docs` rows split into pages of `limit`.
    pub fn new(total_docs: usize, page: usize, limit: usize) -> Self {
        let pages = page_count(total_docs, limit);
        let has_prev_page = page > 1;
        let has_next_page = page < pages;
        Self {
            total_docs,
            page,
            limit,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total_docs, self.limit)
    }
}

/// One page of rows fetched for an effective query.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ListPage<T> {
    pub docs: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> ListPage<T> {
    pub fn new(docs: Vec<T>, meta: PaginationMeta) -> Self {
        Self { docs, meta }
    }

    pub fn page_count(&self) -> usize {
        self.meta.page_count()
    }
}
