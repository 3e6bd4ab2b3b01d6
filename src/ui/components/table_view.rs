use dioxus::prelude::*;
use tracing::warn;

use crate::domain::entities::column::ColumnVisibility;
use crate::domain::entities::table::TableRow;
use crate::ui::components::data_table::{DataTable, RowAction, RowControls};
use crate::ui::components::notice::NoticeBanner;
use crate::ui::components::pagination::TablePagination;
use crate::ui::components::toolbar::TableToolbar;
use crate::ui::state::app_state::{AppServices, AppState};
use crate::ui::table::debounce::SearchDebounce;
use crate::ui::table::toolbar::{apply_toolbar_action, ToolbarAction};
use crate::ui::table::view::{table_snapshot, TableChrome, TableOptions, TableSnapshot};
use crate::usecase::services::entity_page::Notice;
use crate::usecase::services::table_controller::{CommitStatus, FetchRequest, TableController};

/// Signals and handlers behind one mounted data table.
pub struct TableHandle<T: 'static> {
    pub controller: Signal<TableController<T>>,
    pub visibility: Signal<ColumnVisibility>,
    pub chrome: Signal<TableChrome>,
    pub debounce: Signal<SearchDebounce>,
    pub error: Signal<Option<String>>,
    pub on_action: Callback<ToolbarAction>,
    pub on_search: Callback<String>,
    pub on_toggle_row: Callback<String>,
    pub on_toggle_page: Callback<bool>,
}

impl<T: 'static> Clone for TableHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for TableHandle<T> {}

fn run_fetch<T: TableRow + Send + 'static>(
    mut controller: Signal<TableController<T>>,
    chrome: Signal<TableChrome>,
    mut error: Signal<Option<String>>,
    request: Option<FetchRequest<T>>,
) {
    let Some(request) = request else {
        return;
    };
    spawn(async move {
        let outcome = request.execute().await;
        let status = controller.write().commit(outcome);
        match status {
            CommitStatus::Applied => {
                if error.peek().is_some() {
                    error.set(None);
                }
            }
            CommitStatus::Failed(err) => error.set(Some(chrome.peek().load_error(err))),
            CommitStatus::Stale => {}
        }
    });
}

impl<T: TableRow + Send + 'static> TableHandle<T> {
    pub fn run(self, request: Option<FetchRequest<T>>) {
        run_fetch(self.controller, self.chrome, self.error, request);
    }

    /// Reloads the current page after a mutation. No-op in client mode.
    pub fn refetch(self) {
        let mut controller = self.controller;
        let request = controller.write().refetch();
        self.run(request);
    }

    pub fn set_data(self, rows: Vec<T>) {
        let mut controller = self.controller;
        controller.write().set_data(rows);
    }

    pub fn snapshot(self) -> TableSnapshot {
        let controller = self.controller.read();
        let visibility = self.visibility.read();
        let chrome = self.chrome.read();
        let debounce = self.debounce.read();
        table_snapshot(&controller, &visibility, &chrome, debounce.latest())
    }
}

/// Mounts a data table: builds the controller once, loads the first page and
/// the saved column visibility, and wires the chrome's actions to it.
pub fn use_data_table<T: TableRow + Send + 'static>(
    init: impl FnOnce() -> TableOptions<T>,
) -> TableHandle<T> {
    let services = use_context::<AppServices>();

    let mut pending_chrome = None;
    let mut controller = use_signal(|| {
        let (controller, chrome) = init().into_parts();
        pending_chrome = Some(chrome);
        controller
    });
    let chrome = use_signal(|| pending_chrome.take().unwrap_or_default());
    let mut visibility = use_signal(ColumnVisibility::default);
    let mut debounce = use_signal(|| SearchDebounce::new(chrome.peek().search_debounce_ms));
    let mut error = use_signal(|| None::<String>);

    let settings = services.settings.clone();
    use_hook(move || {
        let persist_key = chrome.peek().persist_key;
        spawn(async move {
            let request = controller.write().refetch();
            run_fetch(controller, chrome, error, request);
            let Some(key) = persist_key else {
                return;
            };
            match settings.load_column_visibility(key).await {
                Ok(saved) => {
                    let restored = {
                        let ctrl = controller.peek();
                        ColumnVisibility::from_map(saved).normalized(ctrl.columns())
                    };
                    visibility.set(restored);
                }
                Err(err) => warn!(table = key, error = %err, "failed to load column visibility"),
            }
        });
    });

    let settings = services.settings.clone();
    let on_action = use_callback(move |action: ToolbarAction| {
        let outcome = {
            let filterables = chrome.peek().filterable_columns.clone();
            let mut ctrl = controller.write();
            let mut vis = visibility.write();
            apply_toolbar_action(&mut ctrl, &mut vis, &filterables, action)
        };
        if let Some(err) = outcome.error {
            error.set(Some(err.to_string()));
        }
        let persist_key = chrome.peek().persist_key;
        if let (true, Some(key)) = (outcome.visibility_changed, persist_key) {
            let settings = settings.clone();
            let saved = visibility.peek().as_map().clone();
            spawn(async move {
                if let Err(err) = settings.save_column_visibility(key, saved).await {
                    warn!(table = key, error = %err, "failed to save column visibility");
                }
            });
        }
        run_fetch(controller, chrome, error, outcome.request);
    });

    let on_search = use_callback(move |value: String| {
        let ticket = debounce.write().input(value);
        let delay = debounce.peek().delay();
        match delay {
            None => on_action.call(ToolbarAction::Search(ticket.value)),
            Some(delay) => {
                spawn(async move {
                    tokio::time::sleep(delay).await;
                    if debounce.peek().is_current(&ticket) {
                        on_action.call(ToolbarAction::Search(ticket.value));
                    }
                });
            }
        }
    });

    let on_toggle_row = use_callback(move |key: String| {
        controller.write().toggle_row_selection(&key);
    });
    let on_toggle_page = use_callback(move |selected: bool| {
        controller.write().set_page_selection(selected);
    });

    TableHandle {
        controller,
        visibility,
        chrome,
        debounce,
        error,
        on_action,
        on_search,
        on_toggle_row,
        on_toggle_page,
    }
}

/// Toolbar, grid and pagination for a mounted table. `actions` lands on the
/// right of the toolbar.
pub fn render_data_table<T: TableRow + Send + 'static>(
    table: TableHandle<T>,
    app: AppState,
    row_controls: Vec<RowControls>,
    on_row_action: Option<EventHandler<(String, RowAction)>>,
    actions: Element,
) -> Element {
    let TableSnapshot {
        grid,
        toolbar,
        pagination,
        fetching,
    } = table.snapshot();
    let load_error = table.error.read().clone();
    let mut error = table.error;

    rsx! {
        if let Some(message) = load_error {
            NoticeBanner {
                notice: Notice::error(message),
                on_dismiss: move |_| error.set(None),
            }
        }
        TableToolbar {
            view: toolbar,
            open_dropdown: app.open_dropdown,
            dropdown_pos: app.dropdown_pos,
            on_search: table.on_search,
            on_action: table.on_action,
            {actions}
        }
        DataTable {
            model: grid,
            row_controls,
            fetching,
            on_action: table.on_action,
            on_row_action,
            on_toggle_row: table.on_toggle_row,
            on_toggle_page: table.on_toggle_page,
        }
        TablePagination { view: pagination, on_action: table.on_action }
    }
}
