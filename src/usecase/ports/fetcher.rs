use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::domain::entities::table::{FetchParams, FetchResult};
use crate::usecase::ports::repo::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid query: {0}")]
    Validation(String),
    #[error("data source failed: {0}")]
    Backend(String),
    #[error("fetch was cancelled: {0}")]
    Cancelled(String),
}

impl From<RepoError> for FetchError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::InvalidQuery(message) => FetchError::Validation(message),
            other => FetchError::Backend(other.to_string()),
        }
    }
}

/// The seam between a table and its data source.
///
/// One call per triggering state change. Implementations must reject rather
/// than return partial data; the caller never retries.
#[async_trait]
pub trait TableFetcher<T>: Send + Sync {
    async fn fetch(&self, params: FetchParams) -> Result<FetchResult<T>, FetchError>;
}

/// Adapter built from an async closure.
pub struct FnFetcher<T, F> {
    fetch: F,
    _rows: PhantomData<fn() -> T>,
}

pub fn fetcher_fn<T, F, Fut>(fetch: F) -> FnFetcher<T, F>
where
    F: Fn(FetchParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResult<T>, FetchError>> + Send + 'static,
{
    FnFetcher {
        fetch,
        _rows: PhantomData,
    }
}

#[async_trait]
impl<T, F, Fut> TableFetcher<T> for FnFetcher<T, F>
where
    T: Send + 'static,
    F: Fn(FetchParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResult<T>, FetchError>> + Send + 'static,
{
    async fn fetch(&self, params: FetchParams) -> Result<FetchResult<T>, FetchError> {
        (self.fetch)(params).await
    }
}
