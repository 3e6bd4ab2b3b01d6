use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::infra::sqlite::repo::SqliteRepo;
use crate::usecase::ports::repo::RepoError;

static DATABASE: OnceLock<Database> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    #[error("database already initialized at {0}")]
    AlreadyInitialized(PathBuf),
    #[error("database not initialized; call Database::initialize first")]
    NotInitialized,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Process-wide handle to the catalog store. Created once at startup.
#[derive(Debug)]
pub struct Database {
    repo: Arc<SqliteRepo>,
}

impl Database {
    /// Creates the schema and installs the global handle. A second call fails
    /// instead of silently replacing the first database.
    pub fn initialize(db_path: &Path) -> Result<&'static Database, DatabaseError> {
        if let Some(existing) = DATABASE.get() {
            return Err(DatabaseError::AlreadyInitialized(
                existing.repo.db_path.clone(),
            ));
        }

        let repo = SqliteRepo::new(db_path);
        repo.init()?;

        let mut installed = false;
        let database = DATABASE.get_or_init(|| {
            installed = true;
            Database {
                repo: Arc::new(repo),
            }
        });
        if !installed {
            return Err(DatabaseError::AlreadyInitialized(
                database.repo.db_path.clone(),
            ));
        }

        info!(path = %db_path.display(), "database initialized");
        Ok(database)
    }

    pub fn get() -> Result<&'static Database, DatabaseError> {
        DATABASE.get().ok_or(DatabaseError::NotInitialized)
    }

    pub fn repo(&self) -> Arc<SqliteRepo> {
        self.repo.clone()
    }

    pub fn path(&self) -> &Path {
        &self.repo.db_path
    }
}
