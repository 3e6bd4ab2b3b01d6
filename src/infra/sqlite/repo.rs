use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::ErrorCode;

use crate::domain::entities::catalog::{Lookups, Shop};
use crate::domain::entities::table::{FetchParams, FetchResult, QueryContext};
use crate::infra::sqlite::entities::SqlEntity;
use crate::infra::sqlite::queries::{
    delete_entity, get_entity, insert_entity, load_column_visibility, load_lookups, load_shops,
    query_entity_page, set_entity_active, update_entity, upsert_column_visibility, InvalidQuery,
    RowMissing,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{
    CatalogRepository, LookupRepository, RepoError, ViewSettingsRepository,
};
use crate::usecase::services::query_service::QueryService;

/// Server-mode adapter backed by the SQLite catalog.
pub type SqliteFetcher<E> = QueryService<E>;

#[derive(Debug, Clone)]
pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl SqliteRepo {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    pub fn fetcher<E: SqlEntity>(self: &Arc<Self>) -> SqliteFetcher<E> {
        QueryService::new(self.clone())
    }
}

fn map_error<E: SqlEntity>(err: anyhow::Error) -> RepoError {
    if let Some(invalid) = err.downcast_ref::<InvalidQuery>() {
        return RepoError::InvalidQuery(invalid.0.clone());
    }
    if let Some(missing) = err.downcast_ref::<RowMissing>() {
        return RepoError::NotFound {
            entity: E::KIND.singular(),
            id: missing.id,
        };
    }
    if let Some(rusqlite::Error::SqliteFailure(failure, detail)) =
        err.downcast_ref::<rusqlite::Error>()
    {
        if failure.code == ErrorCode::ConstraintViolation {
            let detail = detail.clone().unwrap_or_else(|| failure.to_string());
            return RepoError::Conflict(format!(
                "{} conflicts with an existing record ({detail})",
                E::KIND.singular()
            ));
        }
    }
    RepoError::Message(format!("{err:#}"))
}

fn map_plain(err: anyhow::Error) -> RepoError {
    RepoError::Message(format!("{err:#}"))
}

impl<E: SqlEntity> CatalogRepository<E> for SqliteRepo {
    fn query_page(&self, params: &FetchParams) -> Result<FetchResult<E>, RepoError> {
        query_entity_page::<E>(&self.db_path, params).map_err(map_error::<E>)
    }

    fn get(&self, id: i64) -> Result<E, RepoError> {
        get_entity::<E>(&self.db_path, id).map_err(map_error::<E>)
    }

    fn create(&self, shop_id: i64, input: E::Input) -> Result<E, RepoError> {
        insert_entity::<E>(&self.db_path, shop_id, &input).map_err(map_error::<E>)
    }

    fn update(&self, id: i64, input: E::Input) -> Result<E, RepoError> {
        update_entity::<E>(&self.db_path, id, &input).map_err(map_error::<E>)
    }

    fn delete(&self, id: i64) -> Result<(), RepoError> {
        delete_entity::<E>(&self.db_path, id).map_err(map_error::<E>)
    }

    fn set_active(&self, id: i64, active: bool) -> Result<E, RepoError> {
        set_entity_active::<E>(&self.db_path, id, active).map_err(map_error::<E>)
    }
}

impl LookupRepository for SqliteRepo {
    fn lookups(&self, context: QueryContext) -> Result<Lookups, RepoError> {
        load_lookups(&self.db_path, context).map_err(map_plain)
    }

    fn shops(&self, context: QueryContext) -> Result<Vec<Shop>, RepoError> {
        load_shops(&self.db_path, context).map_err(map_plain)
    }
}

impl ViewSettingsRepository for SqliteRepo {
    fn load_column_visibility(&self, table_key: &str) -> Result<BTreeMap<String, bool>, RepoError> {
        load_column_visibility(&self.db_path, table_key).map_err(map_plain)
    }

    fn upsert_column_visibility(
        &self,
        table_key: &str,
        visibility: &BTreeMap<String, bool>,
    ) -> Result<(), RepoError> {
        upsert_column_visibility(&self.db_path, table_key, visibility).map_err(map_plain)
    }
}
