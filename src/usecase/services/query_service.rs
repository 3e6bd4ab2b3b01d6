use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::catalog::{CatalogEntity, Lookups, Shop};
use crate::domain::entities::table::{FetchParams, FetchResult, QueryContext};
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::ports::fetcher::{FetchError, TableFetcher};
use crate::usecase::ports::repo::{
    CatalogRepository, LookupRepository, RepoError, ViewSettingsRepository,
};

/// Server-mode adapter for one entity table.
pub struct QueryService<E: CatalogEntity> {
    repo: Arc<dyn CatalogRepository<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: CatalogEntity> QueryService<E> {
    pub fn new(repo: Arc<dyn CatalogRepository<E>>) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: CatalogEntity> TableFetcher<E> for QueryService<E> {
    async fn fetch(&self, params: FetchParams) -> Result<FetchResult<E>, FetchError> {
        debug!(
            table = E::KIND.table_key(),
            page_index = params.page_index,
            page_size = params.page_size,
            "fetching page"
        );
        let repo = self.repo.clone();
        run_blocking(move || repo.query_page(&params))
            .await
            .map_err(|err| FetchError::Cancelled(err.to_string()))?
            .map_err(FetchError::from)
    }
}

/// Settings and option lists shared by every entity page.
#[derive(Clone)]
pub struct CatalogSettingsService {
    lookups: Arc<dyn LookupRepository>,
    view_settings: Arc<dyn ViewSettingsRepository>,
}

impl CatalogSettingsService {
    pub fn new(
        lookups: Arc<dyn LookupRepository>,
        view_settings: Arc<dyn ViewSettingsRepository>,
    ) -> Self {
        Self {
            lookups,
            view_settings,
        }
    }

    pub async fn lookups(&self, context: QueryContext) -> Result<Lookups, RepoError> {
        let repo = self.lookups.clone();
        run_blocking(move || repo.lookups(context))
            .await
            .map_err(RepoError::message)?
    }

    pub async fn shops(&self, context: QueryContext) -> Result<Vec<Shop>, RepoError> {
        let repo = self.lookups.clone();
        run_blocking(move || repo.shops(context))
            .await
            .map_err(RepoError::message)?
    }

    pub async fn load_column_visibility(
        &self,
        table_key: &'static str,
    ) -> Result<BTreeMap<String, bool>, RepoError> {
        let repo = self.view_settings.clone();
        run_blocking(move || repo.load_column_visibility(table_key))
            .await
            .map_err(RepoError::message)?
    }

    pub async fn save_column_visibility(
        &self,
        table_key: &'static str,
        visibility: BTreeMap<String, bool>,
    ) -> Result<(), RepoError> {
        let repo = self.view_settings.clone();
        run_blocking(move || repo.upsert_column_visibility(table_key, &visibility))
            .await
            .map_err(RepoError::message)?
    }
}
