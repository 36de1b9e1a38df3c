//! Table state restored from a URL query string.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::query::InitialQuery;
use crate::domain::types::{FilterKey, PageNumber, PageSize, SortOrder, is_constraint};
use crate::forms::FormError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Query-string parameters a list view may be opened with.
pub struct TableStateForm {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    /// Raw rows-per-page value, validated against the offered sizes.
    pub limit: Option<String>,
    #[validate(length(max = 200))]
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub price: Option<String>,
}

impl TableStateForm {
    pub fn from_query_string(input: &str) -> Result<Self, FormError> {
        serde_html_form::from_str(input).map_err(|err| FormError::Malformed(err.to_string()))
    }

    /// Validates the form and turns it into controller overrides.
    pub fn into_initial(self, page_size_options: &[usize]) -> Result<InitialQuery, FormError> {
        self.validate()?;

        let page = self.page.map(PageNumber::new).transpose()?;
        let limit = self
            .limit
            .as_deref()
            .map(|raw| PageSize::parse(raw, page_size_options))
            .transpose()?;
        let sort_order = self
            .sort_order
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?;

        let start = parse_date(self.start_date.as_deref())?;
        let end = parse_date(self.end_date.as_deref())?;
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(FormError::InvalidDateRange);
        }

        let filters: BTreeMap<FilterKey, String> = [
            (FilterKey::Status, self.status),
            (FilterKey::Category, self.category),
            (FilterKey::StartDate, self.start_date),
            (FilterKey::EndDate, self.end_date),
            (FilterKey::Price, self.price),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| is_constraint(v)).map(|v| (key, v)))
        .collect();

        Ok(InitialQuery {
            page,
            limit,
            search: self.search,
            sort_field: self.sort_field.filter(|field| !field.trim().is_empty()),
            sort_order,
            filters,
            extra: BTreeMap::new(),
        })
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, FormError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FormError::InvalidDate(raw.to_string())),
        None => Ok(None),
    }
}
