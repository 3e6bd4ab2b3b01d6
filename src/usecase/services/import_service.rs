use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::entities::column::ColumnDef;
use crate::infra::export::csv::export_view_csv;
use crate::infra::import::csv::{import_products_csv, ImportSummary};
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::ports::repo::RepoError;

/// CSV in and out of the catalog.
#[derive(Debug, Clone)]
pub struct ImportService {
    db_path: PathBuf,
}

impl ImportService {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub async fn import_products(
        &self,
        shop_id: i64,
        csv_path: PathBuf,
    ) -> Result<ImportSummary, RepoError> {
        let db_path = self.db_path.clone();
        let source = csv_path.display().to_string();
        let result = run_blocking(move || import_products_csv(&db_path, shop_id, &csv_path))
            .await
            .map_err(RepoError::message)?
            .map_err(|err| RepoError::Message(format!("{err:#}")));

        match &result {
            Ok(summary) => info!(
                %source,
                shop_id,
                inserted = summary.inserted,
                updated = summary.updated,
                "imported products"
            ),
            Err(err) => warn!(%source, shop_id, error = %err, "product import failed"),
        }
        result
    }

    /// Writes the rows currently on screen with the visible columns only.
    pub fn export_view<T>(
        &self,
        path: &Path,
        columns: &[&ColumnDef<T>],
        rows: &[&T],
    ) -> Result<usize, RepoError> {
        let written = export_view_csv(path, columns, rows)
            .map_err(|err| RepoError::Message(format!("{err:#}")))?;
        info!(path = %path.display(), rows = written, "exported view");
        Ok(written)
    }
}
