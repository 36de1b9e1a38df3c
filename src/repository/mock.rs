//! Mock repository implementations for isolating services in tests.

use mockall::mock;
use serde_json::Value;

use crate::domain::page::ListPage;
use crate::domain::query::EffectiveQuery;
use crate::repository::ListReader;
use crate::repository::errors::RepositoryResult;

mock! {
    pub Repository {}

    impl ListReader<Value> for Repository {
        fn fetch_page(&self, query: &EffectiveQuery) -> RepositoryResult<ListPage<Value>>;
    }
}
