use std::sync::Arc;

use crate::domain::entities::column::{ColumnDef, ColumnVisibility};
use crate::domain::entities::table::{QueryContext, TableRow, DEFAULT_PAGE_SIZE};
use crate::ui::table::grid::{build_grid, GridChrome, GridModel};
use crate::ui::table::pagination::PaginationView;
use crate::ui::table::toolbar::{FilterableColumn, ToolbarView};
use crate::usecase::ports::fetcher::TableFetcher;
use crate::usecase::services::table_controller::{SelectionListener, TableController, TableSource};

const DEFAULT_SEARCH_PLACEHOLDER: &str = "Search…";

/// Everything one data table is built from. Omitting the server adapter runs
/// the table in client mode over `data`.
pub struct TableOptions<T> {
    pub columns: Vec<ColumnDef<T>>,
    pub source: TableSource<T>,
    pub initial_page_size: usize,
    pub filterable_columns: Vec<FilterableColumn>,
    pub enable_row_selection: bool,
    pub on_row_selection_change: Option<SelectionListener<T>>,
    pub toolbar_title: Option<String>,
    pub global_filter_placeholder: Option<String>,
    pub persist_key: Option<&'static str>,
    pub search_debounce_ms: u64,
    pub row_actions: bool,
}

/// Render settings that outlive construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableChrome {
    pub filterable_columns: Vec<FilterableColumn>,
    pub toolbar_title: Option<String>,
    pub global_filter_placeholder: String,
    pub persist_key: Option<&'static str>,
    pub search_debounce_ms: u64,
    pub row_actions: bool,
}

impl TableChrome {
    pub fn load_error(&self, err: impl std::fmt::Display) -> String {
        let subject = self
            .toolbar_title
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| "rows".to_string());
        format!("Could not load {subject}: {err}")
    }
}

impl<T: TableRow + Send + 'static> TableOptions<T> {
    fn with_source(columns: Vec<ColumnDef<T>>, source: TableSource<T>) -> Self {
        Self {
            columns,
            source,
            initial_page_size: DEFAULT_PAGE_SIZE,
            filterable_columns: Vec::new(),
            enable_row_selection: false,
            on_row_selection_change: None,
            toolbar_title: None,
            global_filter_placeholder: None,
            persist_key: None,
            search_debounce_ms: 0,
            row_actions: false,
        }
    }

    pub fn client(columns: Vec<ColumnDef<T>>, data: Vec<T>) -> Self {
        Self::with_source(columns, TableSource::Client(data))
    }

    pub fn server(
        columns: Vec<ColumnDef<T>>,
        fetcher: Arc<dyn TableFetcher<T>>,
        context: QueryContext,
    ) -> Self {
        Self::with_source(columns, TableSource::Server { fetcher, context })
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.initial_page_size = page_size;
        self
    }

    pub fn filterable(mut self, columns: Vec<FilterableColumn>) -> Self {
        self.filterable_columns = columns;
        self
    }

    pub fn row_selection(mut self, listener: Option<SelectionListener<T>>) -> Self {
        self.enable_row_selection = true;
        self.on_row_selection_change = listener;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.toolbar_title = Some(title.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.global_filter_placeholder = Some(placeholder.into());
        self
    }

    /// Column visibility is saved under `key`.
    pub fn persist_as(mut self, key: &'static str) -> Self {
        self.persist_key = Some(key);
        self
    }

    pub fn debounce_ms(mut self, delay_ms: u64) -> Self {
        self.search_debounce_ms = delay_ms;
        self
    }

    pub fn with_row_actions(mut self) -> Self {
        self.row_actions = true;
        self
    }

    pub fn into_parts(self) -> (TableController<T>, TableChrome) {
        let mut controller =
            TableController::new(self.columns, self.source, self.initial_page_size);
        if self.enable_row_selection {
            controller = controller.with_row_selection(self.on_row_selection_change);
        }
        let chrome = TableChrome {
            filterable_columns: self.filterable_columns,
            toolbar_title: self.toolbar_title,
            global_filter_placeholder: self
                .global_filter_placeholder
                .unwrap_or_else(|| DEFAULT_SEARCH_PLACEHOLDER.to_string()),
            persist_key: self.persist_key,
            search_debounce_ms: self.search_debounce_ms,
            row_actions: self.row_actions,
        };
        (controller, chrome)
    }
}

/// One render's worth of view models.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub grid: GridModel,
    pub toolbar: ToolbarView,
    pub pagination: PaginationView,
    pub fetching: bool,
}

pub fn table_snapshot<T: TableRow + Send + 'static>(
    controller: &TableController<T>,
    visibility: &ColumnVisibility,
    chrome: &TableChrome,
    search_value: &str,
) -> TableSnapshot {
    let rows = controller.page_rows();
    let grid = build_grid(
        controller.columns(),
        visibility,
        &rows,
        controller.state(),
        controller.selected_keys(),
        GridChrome {
            selection: controller.selection_enabled(),
            row_actions: chrome.row_actions,
        },
    );
    let toolbar = ToolbarView::new(
        chrome.toolbar_title.clone(),
        chrome.global_filter_placeholder.clone(),
        search_value,
        controller.state(),
        &chrome.filterable_columns,
        controller.columns(),
        visibility,
    );
    let pagination = PaginationView::new(
        controller.state().pagination,
        controller.page_count(),
        controller.total(),
        rows.len(),
        controller.is_server_mode(),
        controller.is_fetching(),
    );
    TableSnapshot {
        grid,
        toolbar,
        pagination,
        fetching: controller.is_fetching(),
    }
}
