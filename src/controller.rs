//! The query-state controller composed by every paginated list view.
//!
//! The controller accepts independent interaction events (typing, filter
//! selection, page clicks, page-size changes, sort clicks) and keeps exactly
//! one [`EffectiveQuery`] consistent with them. Search input is debounced;
//! everything else applies synchronously.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::debounce::{DebounceState, Debouncer, Generation};
use crate::domain::query::{EffectiveQuery, InitialQuery, QueryState, SortDescriptor};
use crate::domain::types::{
    FilterKey, PageNumber, PageSize, TypeConstraintError, normalize_search,
};
use crate::models::config::TableConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("controller has been disposed")]
    Disposed,

    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// A user gesture on a list view, expressed as data.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TableEvent {
    Search { text: String },
    Filter { key: FilterKey, value: String },
    Page { page: usize },
    PageSize { value: String },
    Sort { model: Vec<SortDescriptor> },
}

#[derive(Debug)]
pub struct QueryStateController {
    config: TableConfig,
    state: QueryState,
    search: Debouncer<String>,
    revision: u64,
}

impl QueryStateController {
    /// Creates a controller for a freshly mounted list view.
    pub fn new(config: TableConfig) -> Self {
        Self::with_initial(config, InitialQuery::default())
    }

    /// Creates a controller whose defaults are overridden by `initial`.
    pub fn with_initial(config: TableConfig, initial: InitialQuery) -> Self {
        let state =
            QueryState::new(config.default_limit, config.default_sort_order).seeded(initial);
        let search = Debouncer::new(config.quiet_period());
        Self {
            config,
            state,
            search,
            revision: 0,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn effective_query(&self) -> EffectiveQuery {
        self.state.effective_query()
    }

    /// Increments every time the effective query changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.search.state()
    }

    /// When the pending search commits if no further edits arrive.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn is_disposed(&self) -> bool {
        self.search.is_disposed()
    }

    /// Records search-box input and (re)arms the debounce timer.
    ///
    /// Returns the generation of the new arming, or `None` when the
    /// normalized text matches what is already pending (or committed, when
    /// nothing is pending) and the timer was left alone.
    pub fn set_search(&mut self, text: &str, now: Instant) -> ControllerResult<Option<Generation>> {
        self.ensure_live()?;
        self.state = self.state.with_raw_search(text);

        let term = normalize_search(text);
        let current = self
            .search
            .pending_value()
            .map(String::as_str)
            .unwrap_or_else(|| self.state.search());
        if term == current {
            return Ok(None);
        }

        log::debug!("Search input changed, arming debounce for {term:?}");
        Ok(self.search.schedule(term, now))
    }

    /// Commits the pending search if its quiet period has elapsed by `now`.
    ///
    /// Returns `true` when the effective query changed.
    pub fn commit_due(&mut self, now: Instant) -> ControllerResult<bool> {
        self.ensure_live()?;
        match self.search.poll(now) {
            Some(term) => Ok(self.commit(term)),
            None => Ok(false),
        }
    }

    /// Commits the pending search if `generation` is still the latest arming.
    pub fn commit_search(&mut self, generation: Generation) -> ControllerResult<bool> {
        self.ensure_live()?;
        match self.search.fire(generation) {
            Some(term) => Ok(self.commit(term)),
            None => Ok(false),
        }
    }

    pub fn set_filter(&mut self, key: FilterKey, value: &str) -> ControllerResult<()> {
        self.ensure_live()?;
        log::debug!("Filter {key} set to {value:?}");
        let next = self.state.with_filter(key, value, self.config.page_reset);
        self.replace(next);
        Ok(())
    }

    /// Moves to `page`. The page count is not checked here; the footer
    /// disables out-of-range navigation.
    pub fn change_page(&mut self, page: usize) -> ControllerResult<()> {
        self.ensure_live()?;
        let page = PageNumber::new(page)?;
        let next = self.state.with_page(page);
        self.replace(next);
        Ok(())
    }

    /// Applies raw page-size input from the rows-per-page selector.
    pub fn change_page_size(&mut self, input: &str) -> ControllerResult<()> {
        self.ensure_live()?;
        let limit = PageSize::parse(input, &self.config.page_size_options).map_err(|err| {
            log::warn!("Rejected page size {input:?}: {err}");
            err
        })?;
        let next = self.state.with_limit(limit);
        self.replace(next);
        Ok(())
    }

    pub fn change_sort(&mut self, model: &[SortDescriptor]) -> ControllerResult<()> {
        self.ensure_live()?;
        if model.len() > 1 {
            log::debug!("Only single-column sort is supported, ignoring {} columns", model.len() - 1);
        }
        let next = self.state.with_sort(model);
        self.replace(next);
        Ok(())
    }

    /// Pulls the current page back to the last page of a result set with
    /// `page_count` pages. Returns `true` when the page moved.
    pub fn clamp_page(&mut self, page_count: usize) -> ControllerResult<bool> {
        self.ensure_live()?;
        let next = self.state.clamped(page_count);
        if next.page() != self.state.page() {
            log::debug!(
                "Clamping page {} to {} of {page_count}",
                self.state.page(),
                next.page()
            );
        }
        Ok(self.replace(next))
    }

    /// Dispatches a UI gesture to the matching operation.
    pub fn apply(&mut self, event: TableEvent, now: Instant) -> ControllerResult<Option<Generation>> {
        match event {
            TableEvent::Search { text } => return self.set_search(&text, now),
            TableEvent::Filter { key, value } => self.set_filter(key, &value)?,
            TableEvent::Page { page } => self.change_page(page)?,
            TableEvent::PageSize { value } => self.change_page_size(&value)?,
            TableEvent::Sort { model } => self.change_sort(&model)?,
        }
        Ok(None)
    }

    /// Tears the controller down. Pending search input is dropped and every
    /// later call fails with [`ControllerError::Disposed`].
    pub fn dispose(&mut self) {
        if !self.is_disposed() {
            log::debug!("Disposing query controller at revision {}", self.revision);
        }
        self.search.dispose();
    }

    fn ensure_live(&self) -> ControllerResult<()> {
        if self.is_disposed() {
            Err(ControllerError::Disposed)
        } else {
            Ok(())
        }
    }

    fn commit(&mut self, term: String) -> bool {
        if term == self.state.search() {
            return false;
        }
        log::debug!("Committing search {term:?}");
        let next = self.state.with_committed_search(term, self.config.page_reset);
        self.replace(next)
    }

    fn replace(&mut self, next: QueryState) -> bool {
        let changed = next.effective_query() != self.state.effective_query();
        self.state = next;
        if changed {
            self.revision += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::query::PageResetPolicy;
    use crate::domain::types::SortOrder;

    fn controller() -> QueryStateController {
        QueryStateController::new(TableConfig::default())
    }

    fn quiet() -> Duration {
        TableConfig::default().quiet_period()
    }

    #[test]
    fn rapid_edits_coalesce_into_the_last_value() {
        let start = Instant::now();
        let mut ctl = controller();
        for (i, text) in ["b", "bo", "bob"].iter().enumerate() {
            ctl.set_search(text, start + Duration::from_millis(100 * i as u64))
                .unwrap();
        }

        assert!(!ctl.commit_due(start + quiet()).unwrap());
        assert_eq!(ctl.effective_query().search, "");

        assert!(ctl.commit_due(start + Duration::from_millis(200) + quiet()).unwrap());
        assert_eq!(ctl.effective_query().search, "bob");
        assert_eq!(ctl.revision(), 1);
    }

    #[test]
    fn short_silence_commits_nothing() {
        let start = Instant::now();
        let mut ctl = controller();
        ctl.set_search("x", start).unwrap();

        assert!(!ctl.commit_due(start + quiet() - Duration::from_millis(1)).unwrap());
        assert_eq!(ctl.debounce_state(), DebounceState::Pending);
        assert_eq!(ctl.revision(), 0);
    }

    #[test]
    fn superseded_generation_is_ignored() {
        let start = Instant::now();
        let mut ctl = controller();
        let first = ctl.set_search("a", start).unwrap().unwrap();
        let second = ctl.set_search("ab", start).unwrap().unwrap();

        assert!(!ctl.commit_search(first).unwrap());
        assert_eq!(ctl.effective_query().search, "");
        assert!(ctl.commit_search(second).unwrap());
        assert_eq!(ctl.effective_query().search, "ab");
    }

    #[test]
    fn whitespace_only_edit_does_not_rearm() {
        let start = Instant::now();
        let mut ctl = controller();
        ctl.set_search("bob", start).unwrap();
        ctl.commit_due(start + quiet()).unwrap();

        let rearmed = ctl.set_search("  Bob ", start + quiet() * 2).unwrap();
        assert_eq!(rearmed, None);
        assert_eq!(ctl.debounce_state(), DebounceState::Idle);
        assert_eq!(ctl.state().raw_search(), "  Bob ");
    }

    #[test]
    fn typing_back_to_the_committed_value_changes_nothing() {
        let start = Instant::now();
        let mut ctl = controller();
        ctl.set_search("a", start).unwrap();
        ctl.set_search("", start + Duration::from_millis(10)).unwrap();

        assert!(!ctl.commit_due(start + quiet() * 2).unwrap());
        assert_eq!(ctl.revision(), 0);
    }

    #[test]
    fn example_session() {
        let start = Instant::now();
        let mut ctl = controller();

        ctl.set_filter(FilterKey::Status, "Active").unwrap();
        let query = ctl.effective_query();
        assert_eq!(query.page, PageNumber::FIRST);
        assert_eq!(query.limit.get(), 10);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.filter(FilterKey::Status), Some("Active"));

        ctl.change_page(3).unwrap();
        ctl.change_page_size("20").unwrap();
        assert_eq!(ctl.state().page(), PageNumber::FIRST);
        assert_eq!(ctl.state().limit().get(), 20);

        ctl.set_search("  Bob  ", start).unwrap();
        ctl.commit_due(start + quiet()).unwrap();
        assert_eq!(ctl.effective_query().search, "bob");
    }

    #[test]
    fn page_size_change_always_resets_page() {
        let mut ctl = QueryStateController::new(TableConfig {
            page_reset: PageResetPolicy::Preserve,
            ..TableConfig::default()
        });
        for size in ["10", "20", "50"] {
            ctl.change_page(8).unwrap();
            ctl.change_page_size(size).unwrap();
            assert_eq!(ctl.state().page(), PageNumber::FIRST);
        }
    }

    #[test]
    fn invalid_page_size_is_rejected_without_touching_state() {
        let mut ctl = controller();
        ctl.change_page(4).unwrap();
        let before = ctl.effective_query();

        let err = ctl.change_page_size("abc").unwrap_err();
        assert_eq!(
            err,
            ControllerError::Constraint(TypeConstraintError::NonNumericPageSize("abc".into()))
        );
        assert_eq!(ctl.effective_query(), before);
    }

    #[test]
    fn page_zero_is_rejected() {
        let mut ctl = controller();
        assert_eq!(
            ctl.change_page(0),
            Err(ControllerError::Constraint(TypeConstraintError::ZeroPage))
        );
    }

    #[test]
    fn filter_change_resets_page_by_default() {
        let start = Instant::now();
        let mut ctl = controller();
        ctl.change_page(6).unwrap();
        ctl.set_filter(FilterKey::Category, "42").unwrap();
        assert_eq!(ctl.state().page(), PageNumber::FIRST);

        ctl.change_page(6).unwrap();
        ctl.set_search("acme", start).unwrap();
        ctl.commit_due(start + quiet()).unwrap();
        assert_eq!(ctl.state().page(), PageNumber::FIRST);
    }

    #[test]
    fn preserve_policy_keeps_page_until_clamped() {
        let mut ctl = QueryStateController::new(TableConfig {
            page_reset: PageResetPolicy::Preserve,
            ..TableConfig::default()
        });
        ctl.change_page(6).unwrap();
        ctl.set_filter(FilterKey::Category, "42").unwrap();
        assert_eq!(ctl.state().page().get(), 6);

        assert!(ctl.clamp_page(2).unwrap());
        assert_eq!(ctl.state().page().get(), 2);
        assert!(!ctl.clamp_page(2).unwrap());
    }

    #[test]
    fn repeated_filter_does_not_bump_revision() {
        let mut ctl = controller();
        ctl.set_filter(FilterKey::Status, "Active").unwrap();
        let revision = ctl.revision();
        ctl.set_filter(FilterKey::Status, "Active").unwrap();
        assert_eq!(ctl.revision(), revision);
    }

    #[test]
    fn apply_dispatches_events() {
        let now = Instant::now();
        let mut ctl = controller();
        ctl.apply(
            TableEvent::Sort {
                model: vec![SortDescriptor::new("createdAt", false)],
            },
            now,
        )
        .unwrap();
        ctl.apply(
            TableEvent::Filter {
                key: FilterKey::EndDate,
                value: "2024-12-31".into(),
            },
            now,
        )
        .unwrap();
        let generation = ctl
            .apply(TableEvent::Search { text: "bob".into() }, now)
            .unwrap();

        assert!(generation.is_some());
        let query = ctl.effective_query();
        assert_eq!(query.sort_field, "createdAt");
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert_eq!(query.filter(FilterKey::EndDate), Some("2024-12-31"));
    }

    #[test]
    fn dispose_drops_pending_search_and_blocks_operations() {
        let start = Instant::now();
        let mut ctl = controller();
        let generation = ctl.set_search("late", start).unwrap().unwrap();
        ctl.dispose();

        assert_eq!(ctl.commit_search(generation), Err(ControllerError::Disposed));
        assert_eq!(ctl.commit_due(start + quiet()), Err(ControllerError::Disposed));
        assert_eq!(
            ctl.set_filter(FilterKey::Status, "Active"),
            Err(ControllerError::Disposed)
        );
        assert_eq!(ctl.effective_query().search, "");
        assert_eq!(ctl.effective_query().filters.len(), 0);
        assert_eq!(ctl.revision(), 0);
    }

    #[test]
    fn table_event_reads_from_json() {
        let event: TableEvent =
            serde_json::from_str(r#"{"op":"filter","key":"startDate","value":"2024-01-01"}"#)
                .unwrap();
        assert_eq!(
            event,
            TableEvent::Filter {
                key: FilterKey::StartDate,
                value: "2024-01-01".into()
            }
        );
    }
}
