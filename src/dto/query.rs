//! Wire forms of the effective query and of list responses.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::domain::page::{ListPage, PaginationMeta};
use crate::domain::query::EffectiveQuery;

impl EffectiveQuery {
    /// Request parameters in the order list endpoints document them: base
    /// fields, then filters under their endpoint names, then fixed extras.
    pub fn to_pairs(&self) -> Vec<(&str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("search", self.search.clone()),
            ("sortField", self.sort_field.clone()),
            ("sortOrder", self.sort_order.to_string()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.wire_name(), value.clone())),
        );
        pairs.extend(
            self.extra
                .iter()
                .map(|(name, value)| (name.as_str(), value.clone())),
        );
        pairs
    }

    /// Encodes the query for a `GET` list endpoint.
    pub fn to_query_string(&self) -> Result<String, serde_html_form::ser::Error> {
        serde_html_form::to_string(self.to_pairs())
    }
}

/// Flat JSON body for `POST` list endpoints. `page` and `limit` stay numeric.
impl Serialize for EffectiveQuery {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map =
            serializer.serialize_map(Some(5 + self.filters.len() + self.extra.len()))?;
        map.serialize_entry("page", &self.page)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("search", &self.search)?;
        map.serialize_entry("sortField", &self.sort_field)?;
        map.serialize_entry("sortOrder", &self.sort_order)?;
        for (key, value) in &self.filters {
            map.serialize_entry(key.wire_name(), value)?;
        }
        for (name, value) in &self.extra {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListData<T> {
    pub meta: PaginationMeta,
    pub docs: Vec<T>,
}

/// Envelope returned by the back-office list endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    pub data: ListData<T>,
}

impl<T> From<ListResponse<T>> for ListPage<T> {
    fn from(response: ListResponse<T>) -> Self {
        ListPage::new(response.data.docs, response.data.meta)
    }
}
