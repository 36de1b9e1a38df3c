//! The seam between the query controller and whatever fetches list pages.

use crate::domain::page::ListPage;
use crate::domain::query::EffectiveQuery;
use crate::dto::query::ListResponse;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod cache;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// Fetches one page of rows for an effective query.
///
/// Implementations own request cancellation and deduplication; the
/// controller only promises that equal queries compare equal.
pub trait ListReader<T> {
    fn fetch_page(&self, query: &EffectiveQuery) -> RepositoryResult<ListPage<T>>;
}

/// Decodes a list endpoint body into a page, turning non-2xx envelopes into
/// [`RepositoryError::Server`].
pub fn decode_list_response<T>(body: &str) -> RepositoryResult<ListPage<T>>
where
    T: serde::de::DeserializeOwned,
{
    let response: ListResponse<T> = serde_json::from_str(body)?;
    if !(200..300).contains(&response.status_code) {
        return Err(RepositoryError::Server {
            status: response.status_code,
            message: response.message,
        });
    }
    Ok(response.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_error_envelopes() {
        let body = r#"{"statusCode":500,"message":"boom","data":{"meta":{"totalDocs":0,"page":1,
            "limit":10,"hasPrevPage":false,"hasNextPage":false,"prevPage":null,"nextPage":null},
            "docs":[]}}"#;
        let err = decode_list_response::<serde_json::Value>(body).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Server {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn decode_reports_malformed_bodies() {
        let err = decode_list_response::<serde_json::Value>("not json").unwrap_err();
        assert!(matches!(err, RepositoryError::Decode(_)));
    }
}
