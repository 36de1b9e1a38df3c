//! Services backing paginated list views.

use serde::Serialize;

use crate::controller::QueryStateController;
use crate::domain::page::PaginationMeta;
use crate::domain::query::EffectiveQuery;
use crate::forms::table::TableStateForm;
use crate::models::config::TableConfig;
use crate::pagination::{PageNavigation, PageSummary, page_count};
use crate::repository::ListReader;
use crate::services::ServiceResult;

/// Data required to render one page of a list view.
#[derive(Debug, Serialize)]
pub struct TablePageData<T> {
    pub rows: Vec<T>,
    pub meta: PaginationMeta,
    #[serde(skip)]
    pub query: EffectiveQuery,
    pub page_count: usize,
    pub summary: PageSummary,
    pub navigation: PageNavigation,
}

/// Creates the controller for a list view opened with `query_string`
/// (the part of the URL after `?`, possibly empty).
pub fn open_table(config: TableConfig, query_string: &str) -> ServiceResult<QueryStateController> {
    let form = TableStateForm::from_query_string(query_string).map_err(|err| {
        log::warn!("Ignoring invalid table state {query_string:?}: {err}");
        err
    })?;
    let initial = form.into_initial(&config.page_size_options)?;
    Ok(QueryStateController::with_initial(config, initial))
}

/// Fetches the page the controller currently points at.
///
/// When the page lies past the end of the result set (for example after a
/// filter narrowed it) the page is clamped to the last one and fetched
/// again. A failed fetch leaves the controller untouched so the same query
/// can simply be retried.
pub fn load_table_page<R, T>(
    repo: &R,
    controller: &mut QueryStateController,
) -> ServiceResult<TablePageData<T>>
where
    R: ListReader<T> + ?Sized,
{
    let mut query = controller.effective_query();
    let mut page = repo.fetch_page(&query).map_err(|err| {
        log::error!("Failed to fetch list page: {err}");
        err
    })?;

    let count = page_count(page.meta.total_docs, query.limit.get());
    if controller.clamp_page(count)? {
        query = controller.effective_query();
        page = repo.fetch_page(&query).map_err(|err| {
            log::error!("Failed to fetch clamped list page: {err}");
            err
        })?;
    }

    let current = query.page.get();
    let count = page_count(page.meta.total_docs, query.limit.get());

    Ok(TablePageData {
        summary: PageSummary::new(current, query.limit.get(), page.meta.total_docs, page.docs.len()),
        navigation: PageNavigation::new(current, count),
        page_count: count,
        rows: page.docs,
        meta: page.meta,
        query,
    })
}
