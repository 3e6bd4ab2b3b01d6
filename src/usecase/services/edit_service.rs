use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::catalog::CatalogEntity;
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::ports::repo::{CatalogRepository, RepoError};

/// Create / update / delete / toggle for one entity type.
pub struct EditService<E: CatalogEntity> {
    repo: Arc<dyn CatalogRepository<E>>,
}

impl<E: CatalogEntity> Clone for EditService<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

fn log_outcome<T>(action: &str, id: Option<i64>, result: &Result<T, RepoError>) {
    match result {
        Ok(_) => info!(action = %action, ?id, "mutation succeeded"),
        Err(err) => warn!(action = %action, ?id, error = %err, "mutation failed"),
    }
}

impl<E: CatalogEntity> EditService<E> {
    pub fn new(repo: Arc<dyn CatalogRepository<E>>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, shop_id: i64, input: E::Input) -> Result<E, RepoError> {
        let repo = self.repo.clone();
        let result = run_blocking(move || repo.create(shop_id, input))
            .await
            .map_err(RepoError::message)
            .and_then(|inner| inner);
        log_outcome(&format!("create {}", E::KIND.singular()), None, &result);
        result
    }

    pub async fn update(&self, id: i64, input: E::Input) -> Result<E, RepoError> {
        let repo = self.repo.clone();
        let result = run_blocking(move || repo.update(id, input))
            .await
            .map_err(RepoError::message)
            .and_then(|inner| inner);
        log_outcome(&format!("update {}", E::KIND.singular()), Some(id), &result);
        result
    }

    pub async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let repo = self.repo.clone();
        let result = run_blocking(move || repo.delete(id))
            .await
            .map_err(RepoError::message)
            .and_then(|inner| inner);
        log_outcome(&format!("delete {}", E::KIND.singular()), Some(id), &result);
        result
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<E, RepoError> {
        let repo = self.repo.clone();
        let result = run_blocking(move || repo.set_active(id, active))
            .await
            .map_err(RepoError::message)
            .and_then(|inner| inner);
        log_outcome(&format!("toggle {}", E::KIND.singular()), Some(id), &result);
        result
    }
}
