//! List query state and the effective query derived from it.
//!
//! [`QueryState`] is a plain value: every update returns a new state and
//! leaves the previous one untouched, so a state handed to a consumer can
//! never change underneath it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{
    FilterKey, PageNumber, PageSize, SortOrder, is_constraint, normalize_search,
};

/// Parameter names owned by the base query. Fixed extra parameters may not
/// shadow them.
pub const BASE_PARAMS: [&str; 5] = ["page", "limit", "search", "sortField", "sortOrder"];

/// What happens to the current page when the result set is narrowed or
/// widened by a filter change or a committed search.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PageResetPolicy {
    /// Jump back to page 1.
    #[default]
    ResetToFirst,
    /// Keep the current page; callers clamp it once the new page count is known.
    Preserve,
}

/// A single sort column as reported by the table header.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortDescriptor {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

impl SortDescriptor {
    pub fn new(id: impl Into<String>, desc: bool) -> Self {
        Self {
            id: id.into(),
            desc,
        }
    }
}

/// Caller-supplied overrides applied when a list view is created.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct InitialQuery {
    pub page: Option<PageNumber>,
    pub limit: Option<PageSize>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    #[serde(default)]
    pub filters: BTreeMap<FilterKey, String>,
    /// Parameters that are always sent, e.g. `type=Buyer` on a list that only
    /// shows buyer enquiries.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// The single canonical parameter set sent to the data layer.
///
/// Equal states always produce equal values, so the query doubles as a cache
/// key for fetched pages.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EffectiveQuery {
    pub page: PageNumber,
    pub limit: PageSize,
    pub search: String,
    pub sort_field: String,
    pub sort_order: SortOrder,
    /// Only filters that constrain the result set.
    pub filters: BTreeMap<FilterKey, String>,
    pub extra: BTreeMap<String, String>,
}

impl EffectiveQuery {
    pub fn filter(&self, key: FilterKey) -> Option<&str> {
        self.filters.get(&key).map(String::as_str)
    }
}

/// Everything a list view knows about the query it is showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    raw_search: String,
    search: String,
    filters: BTreeMap<FilterKey, String>,
    page: PageNumber,
    limit: PageSize,
    sort_field: String,
    sort_order: SortOrder,
    default_sort_order: SortOrder,
    extra: BTreeMap<String, String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PageSize::DEFAULT, SortOrder::Desc)
    }
}

impl QueryState {
    /// Creates the state a freshly mounted list view starts from.
    pub fn new(limit: PageSize, sort_order: SortOrder) -> Self {
        Self {
            raw_search: String::new(),
            search: String::new(),
            filters: BTreeMap::new(),
            page: PageNumber::FIRST,
            limit,
            sort_field: String::new(),
            sort_order,
            default_sort_order: sort_order,
            extra: BTreeMap::new(),
        }
    }

    /// Applies caller-supplied overrides on top of this state.
    ///
    /// An initial search is committed immediately; it is not debounced.
    #[must_use]
    pub fn seeded(self, initial: InitialQuery) -> Self {
        let InitialQuery {
            page,
            limit,
            search,
            sort_field,
            sort_order,
            filters,
            extra,
        } = initial;

        let extra = extra
            .into_iter()
            .filter(|(name, _)| {
                let shadows = BASE_PARAMS.contains(&name.as_str())
                    || FilterKey::ALL.iter().any(|key| key.wire_name() == name.as_str());
                if shadows {
                    log::warn!("Ignoring fixed parameter {name} that shadows a query field");
                }
                !shadows
            })
            .collect();

        let search = search.unwrap_or_default();

        Self {
            search: normalize_search(&search),
            raw_search: search,
            filters,
            page: page.unwrap_or(self.page),
            limit: limit.unwrap_or(self.limit),
            sort_field: sort_field.unwrap_or(self.sort_field),
            sort_order: sort_order.unwrap_or(self.sort_order),
            default_sort_order: self.default_sort_order,
            extra,
        }
    }

    pub fn raw_search(&self) -> &str {
        &self.raw_search
    }

    /// The search text that was last committed by the debounce timer.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self, key: FilterKey) -> Option<&str> {
        self.filters.get(&key).map(String::as_str)
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    pub fn limit(&self) -> PageSize {
        self.limit
    }

    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Records the text currently in the search box.
    #[must_use]
    pub fn with_raw_search(&self, text: &str) -> Self {
        Self {
            raw_search: text.to_string(),
            ..self.clone()
        }
    }

    /// Commits an already normalized search term.
    #[must_use]
    pub fn with_committed_search(&self, term: String, policy: PageResetPolicy) -> Self {
        let page = if term != self.search && policy == PageResetPolicy::ResetToFirst {
            PageNumber::FIRST
        } else {
            self.page
        };
        Self {
            search: term,
            page,
            ..self.clone()
        }
    }

    /// Stores a filter value. A blank value clears the constraint.
    #[must_use]
    pub fn with_filter(&self, key: FilterKey, value: &str, policy: PageResetPolicy) -> Self {
        let before = self.filter(key).filter(|v| is_constraint(v));
        let after = Some(value).filter(|v| is_constraint(v));

        let mut filters = self.filters.clone();
        if value.is_empty() {
            filters.remove(&key);
        } else {
            filters.insert(key, value.to_string());
        }

        let page = if before != after && policy == PageResetPolicy::ResetToFirst {
            PageNumber::FIRST
        } else {
            self.page
        };

        Self {
            filters,
            page,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_page(&self, page: PageNumber) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Changes the page size. Page numbers only make sense for a fixed page
    /// size, so the page always returns to 1.
    #[must_use]
    pub fn with_limit(&self, limit: PageSize) -> Self {
        Self {
            limit,
            page: PageNumber::FIRST,
            ..self.clone()
        }
    }

    /// Applies a sort model. Only the first descriptor is honoured; an empty
    /// model clears the sort column and restores the default order.
    #[must_use]
    pub fn with_sort(&self, model: &[SortDescriptor]) -> Self {
        let (sort_field, sort_order) = match model.first() {
            Some(descriptor) => (
                descriptor.id.clone(),
                if descriptor.desc {
                    SortOrder::Desc
                } else {
                    SortOrder::Asc
                },
            ),
            None => (String::new(), self.default_sort_order),
        };
        Self {
            sort_field,
            sort_order,
            ..self.clone()
        }
    }

    /// Pulls the page back into `1..=page_count`.
    #[must_use]
    pub fn clamped(&self, page_count: usize) -> Self {
        let last = page_count.max(1);
        let page = if self.page.get() > last {
            PageNumber::new(last).unwrap_or(PageNumber::FIRST)
        } else {
            self.page
        };
        Self {
            page,
            ..self.clone()
        }
    }

    /// Derives the effective query: base pagination and sort fields, the
    /// committed search, every filter whose value constrains, and the fixed
    /// extra parameters.
    pub fn effective_query(&self) -> EffectiveQuery {
        let filters = self
            .filters
            .iter()
            .filter(|(_, value)| is_constraint(value))
            .map(|(key, value)| (*key, value.clone()))
            .collect();

        EffectiveQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
            sort_field: self.sort_field.clone(),
            sort_order: self.sort_order,
            filters,
            extra: self.extra.clone(),
        }
    }
}
