use std::collections::BTreeMap;

use crate::domain::entities::catalog::{CatalogEntity, Lookups, Shop};
use crate::domain::entities::table::{FetchParams, FetchResult, QueryContext};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    Message(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{0}")]
    Conflict(String),
}

impl RepoError {
    pub fn message(err: impl std::fmt::Display) -> Self {
        RepoError::Message(err.to_string())
    }
}

/// Storage for one entity type. Blocking; callers move it off the UI thread.
pub trait CatalogRepository<E: CatalogEntity>: Send + Sync {
    fn query_page(&self, params: &FetchParams) -> Result<FetchResult<E>, RepoError>;
    fn get(&self, id: i64) -> Result<E, RepoError>;
    fn create(&self, shop_id: i64, input: E::Input) -> Result<E, RepoError>;
    fn update(&self, id: i64, input: E::Input) -> Result<E, RepoError>;
    fn delete(&self, id: i64) -> Result<(), RepoError>;
    fn set_active(&self, id: i64, active: bool) -> Result<E, RepoError>;
}

pub trait LookupRepository: Send + Sync {
    fn lookups(&self, context: QueryContext) -> Result<Lookups, RepoError>;
    fn shops(&self, context: QueryContext) -> Result<Vec<Shop>, RepoError>;
}

pub trait ViewSettingsRepository: Send + Sync {
    fn load_column_visibility(&self, table_key: &str) -> Result<BTreeMap<String, bool>, RepoError>;
    fn upsert_column_visibility(
        &self,
        table_key: &str,
        visibility: &BTreeMap<String, bool>,
    ) -> Result<(), RepoError>;
}
