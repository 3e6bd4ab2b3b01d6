use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::catalog::EntityKind;
use crate::domain::entities::table::QueryContext;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::ui::components::dropdown::DropdownId;
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::query_service::CatalogSettingsService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Shops,
    Catalog(EntityKind),
}

impl AdminTab {
    pub fn all() -> Vec<AdminTab> {
        let mut tabs = vec![AdminTab::Shops];
        tabs.extend(EntityKind::ALL.into_iter().map(AdminTab::Catalog));
        tabs
    }

    pub fn key(self) -> &'static str {
        match self {
            AdminTab::Shops => "shops",
            AdminTab::Catalog(kind) => kind.table_key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminTab::Shops => "Shops",
            AdminTab::Catalog(kind) => kind.label(),
        }
    }
}

/// Window-wide UI state shared by every page.
#[derive(Clone, Copy)]
pub struct AppState {
    pub active: Signal<AdminTab>,
    pub context: Signal<QueryContext>,
    pub open_dropdown: Signal<Option<DropdownId>>,
    pub dropdown_pos: Signal<Option<(f64, f64)>>,
}

impl AppState {
    pub fn new(context: QueryContext) -> Self {
        Self {
            active: use_signal(|| AdminTab::Catalog(EntityKind::Product)),
            context: use_signal(|| context),
            open_dropdown: use_signal(|| None::<DropdownId>),
            dropdown_pos: use_signal(|| None::<(f64, f64)>),
        }
    }
}

/// Storage handles and settings resolved once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub repo: Arc<SqliteRepo>,
    pub settings: CatalogSettingsService,
    pub import: ImportService,
    pub initial_context: QueryContext,
    pub page_size: usize,
    pub debounce_ms: u64,
    pub export_dir: PathBuf,
}

impl AppServices {
    pub fn new(
        repo: Arc<SqliteRepo>,
        initial_context: QueryContext,
        page_size: usize,
        debounce_ms: u64,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            settings: CatalogSettingsService::new(repo.clone(), repo.clone()),
            import: ImportService::new(repo.db_path.clone()),
            repo,
            initial_context,
            page_size,
            debounce_ms,
            export_dir,
        }
    }
}
