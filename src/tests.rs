use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::app::context_options;
use crate::config::{AppConfig, ENV_CONTEXT, ENV_LOG, ENV_PAGE_SIZE};
use crate::domain::entities::catalog::{
    slugify, split_values, Coupon, DiscountKind, Lookups, Product, ProductInput, Tag, TagInput,
    TaxRate,
};
use crate::domain::entities::column::{ColumnDef, ColumnVisibility};
use crate::domain::entities::mutation::{MutationKind, MutationState, SlotError, NEW_ROW_KEY};
use crate::domain::entities::table::{
    normalize_column_filters, CellValue, ColumnFilter, ColumnSort, FetchParams, FetchResult,
    FilterValue, PaginationState, QueryContext, QueryState, SortDirection, TableRow,
    PAGE_COUNT_UNKNOWN,
};
use crate::infra::export::csv::write_view_csv;
use crate::infra::import::csv::import_products_from_reader;
use crate::infra::sqlite::database::{Database, DatabaseError};
use crate::infra::sqlite::queries::{
    load_column_visibility, load_lookups, load_shops, query_entity_page, upsert_column_visibility,
};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::infra::sqlite::seed::seed_demo_catalog;
use crate::logging::{build_filter, filter_directives};
use crate::platform::desktop::dialogs::accept_extensions;
use crate::ui::form::{FormError, FormState, FormValues};
use crate::ui::pages::shops::{shop_columns, shop_filterables};
use crate::ui::pages::{create_shop_id, dialog_fields, EntityAdmin, SHOP_FIELD};
use crate::ui::styles::table_header_cell_style;
use crate::ui::table::debounce::SearchDebounce;
use crate::ui::table::grid::{build_grid, GridBody, GridChrome, EMPTY_MESSAGE};
use crate::ui::table::pagination::{can_go_next, PaginationView};
use crate::ui::table::toolbar::{
    apply_toolbar_action, FilterInputError, FilterableColumn, ToolbarAction, ToolbarView,
    ALL_OPTION_VALUE,
};
use crate::ui::table::view::{table_snapshot, TableOptions};
use crate::usecase::ports::fetcher::{fetcher_fn, FetchError, TableFetcher};
use crate::usecase::ports::repo::{CatalogRepository, RepoError};
use crate::usecase::services::client_rows::compute_page;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::entity_page::{
    DialogTarget, EntityPageState, NoticeLevel, PageError, PageMode, RowState,
};
use crate::usecase::services::table_controller::{
    next_sort, CommitStatus, SelectionListener, TableController,
};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("marketplace-{prefix}-{nanos}"))
}

fn seeded_db(prefix: &str) -> (PathBuf, PathBuf) {
    let temp_dir = unique_test_dir(prefix);
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    init_db(&db_path).expect("init_db should succeed");
    assert!(
        seed_demo_catalog(&db_path).expect("seed should succeed"),
        "fresh db should be seeded"
    );
    (temp_dir, db_path)
}

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: i64,
    name: String,
    color: &'static str,
    price: f64,
    active: bool,
}

impl TableRow for Item {
    fn row_key(&self) -> String {
        self.id.to_string()
    }
}

const COLORS: [&str; 3] = ["red", "blue", "green"];

fn items(count: i64) -> Vec<Item> {
    (0..count)
        .map(|id| Item {
            id,
            name: format!("Item {id:02}"),
            color: COLORS[(id % 3) as usize],
            price: ((id * 37) % 50) as f64 + 0.5,
            active: id % 4 != 3,
        })
        .collect()
}

fn item_columns() -> Vec<ColumnDef<Item>> {
    vec![
        ColumnDef::new("name", "Name", |row: &Item| CellValue::text(row.name.clone())).always_visible(),
        ColumnDef::new("color", "Color", |row: &Item| CellValue::text(row.color)),
        ColumnDef::new("price", "Price", |row: &Item| CellValue::Number(row.price)),
        ColumnDef::new("active", "Active", |row: &Item| CellValue::Boolean(row.active)),
    ]
}

fn serve_page(data: &[Item], params: &FetchParams) -> FetchResult<Item> {
    let state = QueryState {
        pagination: PaginationState {
            page_index: params.page_index,
            page_size: params.page_size,
        },
        sorting: params.sorting.clone(),
        column_filters: params.column_filters.clone(),
        global_filter: params.global_filter.clone(),
    };
    let columns = item_columns();
    let page = compute_page(&columns, data, &state);
    FetchResult {
        rows: page.rows.into_iter().cloned().collect(),
        page_count: page.page_count,
        total: page.total,
    }
}

/// In-memory server adapter over `data`; a search for "boom" fails.
fn item_fetcher(data: Vec<Item>) -> Arc<dyn TableFetcher<Item>> {
    let data = Arc::new(data);
    Arc::new(fetcher_fn(move |params: FetchParams| {
        let data = data.clone();
        async move {
            if params.global_filter == "boom" {
                return Err(FetchError::Backend("storage offline".to_string()));
            }
            Ok(serve_page(&data, &params))
        }
    }))
}

fn server_controller(count: i64) -> TableController<Item> {
    TableController::server(item_columns(), item_fetcher(items(count)), QueryContext::Admin, 10)
}

fn row_keys(rows: &[&Item]) -> Vec<String> {
    rows.iter().map(|row| row.row_key()).collect()
}

fn shop_params(shop_id: i64, page_size: usize) -> FetchParams {
    FetchParams::from_state(
        &QueryState::new(page_size),
        QueryContext::Shop { shop_id },
    )
}

#[test]
fn query_changes_reset_page_index() {
    let mut controller = TableController::client(item_columns(), items(40), 10);

    let _ = controller.set_page_index(2);
    assert_eq!(controller.state().pagination.page_index, 2);
    let _ = controller.toggle_sort("price");
    assert_eq!(controller.state().pagination.page_index, 0, "sorting resets the page");

    let _ = controller.set_page_index(2);
    let _ = controller.set_column_filter("color", Some(FilterValue::Text("red".to_string())));
    assert_eq!(controller.state().pagination.page_index, 0, "filtering resets the page");

    let _ = controller.set_page_index(1);
    let _ = controller.set_global_filter(|_| "item".to_string());
    assert_eq!(controller.state().pagination.page_index, 0, "search resets the page");

    let _ = controller.set_page_index(1);
    let _ = controller.set_page_size(20);
    assert_eq!(
        controller.state().pagination,
        PaginationState {
            page_index: 0,
            page_size: 20
        }
    );

    let _ = controller.set_page_index(1);
    let _ = controller.set_pagination(|prev| PaginationState {
        page_index: prev.page_index,
        page_size: prev.page_size,
    });
    assert_eq!(
        controller.state().pagination.page_index,
        1,
        "an unchanged page size keeps the page"
    );
}

#[test]
fn column_filter_round_trip_and_blank_removal() {
    let mut controller = TableController::client(item_columns(), items(12), 10);

    let _ = controller.set_column_filter("color", Some(FilterValue::Text("red".to_string())));
    assert_eq!(
        controller.state().column_filter("color"),
        Some(&FilterValue::Text("red".to_string()))
    );
    assert_eq!(controller.total(), 4);

    let _ = controller.set_column_filter("color", Some(FilterValue::Text("   ".to_string())));
    assert!(controller.column_filters().is_empty(), "blank value removes the entry");

    let _ = controller.set_column_filter("active", Some(FilterValue::Boolean(false)));
    let _ = controller.set_column_filter("active", None);
    assert!(controller.column_filters().is_empty(), "None removes the entry");
    assert_eq!(controller.total(), 12);
}

#[test]
fn normalize_column_filters_keeps_last_write_per_id() {
    let normalized = normalize_column_filters(vec![
        ColumnFilter::new("color", FilterValue::Text("red".to_string())),
        ColumnFilter::new("price", FilterValue::Number(3.0)),
        ColumnFilter::new("color", FilterValue::Text("blue".to_string())),
        ColumnFilter::new("name", FilterValue::Select(" ".to_string())),
    ]);

    assert_eq!(
        normalized,
        vec![
            ColumnFilter::new("color", FilterValue::Text("blue".to_string())),
            ColumnFilter::new("price", FilterValue::Number(3.0)),
        ]
    );
}

#[test]
fn sort_cycle_runs_asc_desc_none() {
    let first = next_sort(&[], "price");
    assert_eq!(first, vec![ColumnSort::asc("price")]);
    let second = next_sort(&first, "price");
    assert_eq!(second, vec![ColumnSort::desc("price")]);
    assert!(next_sort(&second, "price").is_empty());
    assert_eq!(next_sort(&second, "name"), vec![ColumnSort::asc("name")]);
}

#[test]
fn client_mode_never_issues_fetches() {
    let mut controller = TableController::client(item_columns(), items(25), 10);

    assert!(!controller.is_server_mode());
    assert!(controller.refetch().is_none());
    assert!(controller.next_page().is_none());
    assert_eq!(controller.page_rows().len(), 10);
    assert_eq!(controller.page_count(), 3);

    let _ = controller.last_page();
    assert_eq!(controller.state().pagination.page_index, 2);
    assert_eq!(controller.page_rows().len(), 5);
}

#[tokio::test]
async fn stale_fetch_results_are_rejected() {
    let mut controller = server_controller(25);

    let first = controller.set_page_index(1).expect("server mode should issue a fetch");
    let second = controller
        .set_column_filter("color", Some(FilterValue::Text("red".to_string())))
        .expect("filter change should issue a fetch");
    assert!(second.seq() > first.seq());
    assert!(controller.is_fetching());

    let second_outcome = second.execute().await;
    let first_outcome = first.execute().await;

    assert_eq!(controller.commit(second_outcome), CommitStatus::Applied);
    assert_eq!(controller.commit(first_outcome), CommitStatus::Stale);
    assert!(!controller.is_fetching());
    assert_eq!(controller.total(), 9);
    assert!(controller
        .page_rows()
        .iter()
        .all(|row| row.color == "red"));
}

#[tokio::test]
async fn older_refetch_of_identical_query_is_rejected() {
    let mut controller = server_controller(25);

    let older = controller.refetch().expect("refetch should issue in server mode");
    let newer = controller.refetch().expect("refetch should issue in server mode");

    assert_eq!(controller.commit(newer.execute().await), CommitStatus::Applied);
    assert_eq!(controller.commit(older.execute().await), CommitStatus::Stale);
}

#[tokio::test]
async fn failed_fetch_keeps_last_good_page() {
    let mut controller = server_controller(25);
    let initial = controller.refetch().expect("initial fetch");
    assert_eq!(controller.commit(initial.execute().await), CommitStatus::Applied);
    let before = row_keys(&controller.page_rows());

    let failing = controller
        .set_global_filter(|_| "boom".to_string())
        .expect("search should issue a fetch");
    let status = controller.commit(failing.execute().await);

    assert!(matches!(status, CommitStatus::Failed(FetchError::Backend(_))));
    assert_eq!(row_keys(&controller.page_rows()), before);
    assert!(controller
        .last_error()
        .is_some_and(|message| message.contains("storage offline")));
    assert!(controller.take_error().is_some());
    assert!(controller.last_error().is_none());
}

#[test]
fn next_button_follows_page_count() {
    assert!(can_go_next(0, PAGE_COUNT_UNKNOWN), "unknown count keeps next enabled");
    assert!(can_go_next(7, PAGE_COUNT_UNKNOWN));
    assert!(can_go_next(1, 3));
    assert!(!can_go_next(2, 3));
    assert!(!can_go_next(0, 1));
    assert!(!can_go_next(0, 0));
}

#[test]
fn pagination_view_hides_refresh_in_client_mode() {
    let client = PaginationView::new(PaginationState::new(10), 1, 4, 4, false, false);
    assert!(!client.show_refresh);
    assert_eq!(client.page_label(), "Page 1");
    assert!(!client.can_previous);
    assert!(!client.can_next);

    let server = PaginationView::new(PaginationState::new(25), PAGE_COUNT_UNKNOWN, 0, 0, true, true);
    assert!(server.show_refresh);
    assert!(server.refresh_disabled);
    assert!(server.can_next);
    assert!(!server.can_last);
    assert!(server.page_of_label().is_none());
    assert_eq!(server.page_sizes, vec![10, 20, 25, 50, 100]);
    assert_eq!(server.summary(), "Showing 0 of 0");
}

#[test]
fn empty_grid_renders_single_spanning_row() {
    let columns = item_columns();
    let state = QueryState::new(10);
    let chrome = GridChrome {
        selection: true,
        row_actions: true,
    };

    let grid = build_grid(
        &columns,
        &ColumnVisibility::default(),
        &[],
        &state,
        &BTreeSet::new(),
        chrome,
    );
    assert!(grid.is_empty());
    assert_eq!(
        grid.body,
        GridBody::Empty {
            colspan: 6,
            message: EMPTY_MESSAGE
        }
    );
    assert_eq!(EMPTY_MESSAGE, "No results");

    let mut visibility = ColumnVisibility::default();
    visibility.set("color", false);
    let grid = build_grid(&columns, &visibility, &[], &state, &BTreeSet::new(), GridChrome::default());
    assert_eq!(
        grid.body,
        GridBody::Empty {
            colspan: 3,
            message: EMPTY_MESSAGE
        }
    );
    assert_eq!(grid.headers.len(), 3);
}

#[test]
fn grid_rows_carry_display_text_and_selection() {
    let columns = item_columns();
    let data = items(3);
    let rows: Vec<&Item> = data.iter().collect();
    let mut state = QueryState::new(10);
    state.sorting = vec![ColumnSort::desc("price")];
    let selected: BTreeSet<String> = ["1".to_string()].into_iter().collect();

    let grid = build_grid(
        &columns,
        &ColumnVisibility::default(),
        &rows,
        &state,
        &selected,
        GridChrome::default(),
    );

    let price_header = grid
        .headers
        .iter()
        .find(|header| header.id == "price")
        .expect("price header should exist");
    assert_eq!(price_header.sort, Some(SortDirection::Desc));
    assert_eq!(price_header.sort_indicator(), " ▼");

    let rendered = grid.rows();
    assert_eq!(rendered.len(), 3);
    assert!(rendered[1].selected);
    assert!(!grid.all_selected());
    assert_eq!(rendered[0].cells[0].text, "Item 00");
    assert_eq!(rendered[0].cells[3].text, "Yes");
}

#[test]
fn hidden_columns_are_forced_back_when_not_hideable() {
    let columns = item_columns();
    let mut visibility = ColumnVisibility::default();
    visibility.set("name", false);
    visibility.set("price", false);
    visibility.set("unknown", false);

    let normalized = visibility.normalized(&columns);
    assert!(normalized.is_visible("name"));
    assert!(!normalized.is_visible("price"));
    assert!(!normalized.as_map().contains_key("unknown"));
    let ids: Vec<&str> = normalized
        .visible_columns(&columns)
        .iter()
        .map(|column| column.id)
        .collect();
    assert_eq!(ids, vec!["name", "color", "active"]);
}

#[tokio::test]
async fn client_and_server_modes_produce_the_same_page() {
    let data = items(30);
    let mut client = TableController::client(item_columns(), data.clone(), 10);
    let mut server = TableController::server(
        item_columns(),
        item_fetcher(data),
        QueryContext::Admin,
        10,
    );

    let _ = client.set_column_filter("color", Some(FilterValue::Text("red".to_string())));
    let _ = client.toggle_sort("price");

    let filter = server
        .set_column_filter("color", Some(FilterValue::Text("red".to_string())))
        .expect("filter should issue a fetch");
    let sort = server.toggle_sort("price").expect("sort should issue a fetch");
    assert_eq!(server.commit(filter.execute().await), CommitStatus::Stale);
    assert_eq!(server.commit(sort.execute().await), CommitStatus::Applied);

    assert_eq!(client.state(), server.state());
    assert_eq!(row_keys(&client.page_rows()), row_keys(&server.page_rows()));
    assert_eq!(client.total(), server.total());
    assert_eq!(client.page_count(), server.page_count());

    let prices: Vec<f64> = client.page_rows().iter().map(|row| row.price).collect();
    let mut sorted = prices.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(prices, sorted);
}

#[tokio::test]
async fn second_page_of_twenty_five_rows() {
    let mut controller = server_controller(25);
    let initial = controller.refetch().expect("initial fetch");
    assert_eq!(controller.commit(initial.execute().await), CommitStatus::Applied);

    let request = controller.set_page_index(1).expect("page change should fetch");
    assert_eq!(request.params().page_index, 1);
    assert_eq!(request.params().offset(), 10);
    assert_eq!(controller.commit(request.execute().await), CommitStatus::Applied);

    let rows = controller.page_rows();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].name, "Item 10");

    let view = PaginationView::new(
        controller.state().pagination,
        controller.page_count(),
        controller.total(),
        rows.len(),
        controller.is_server_mode(),
        controller.is_fetching(),
    );
    assert_eq!(view.page_label(), "Page 2");
    assert_eq!(view.page_of_label().as_deref(), Some("of 3"));
    assert!(view.can_previous);
    assert!(view.can_next);
    assert!(view.show_refresh);
    assert!(!view.refresh_disabled);
    assert_eq!(view.summary(), "Showing 11–20 of 25");
}

#[test]
fn selection_notifies_listener_and_clears_on_page_change() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let listener: SelectionListener<Item> =
        Box::new(move |rows: &[&Item]| sink.borrow_mut().push(rows.len()));
    let mut controller =
        TableController::client(item_columns(), items(25), 10).with_row_selection(Some(listener));

    controller.toggle_row_selection("3");
    assert!(controller.is_selected("3"));
    controller.set_page_selection(true);
    assert_eq!(controller.selected_rows().len(), 10);
    let _ = controller.next_page();
    assert!(controller.selected_keys().is_empty());

    assert_eq!(*seen.borrow(), vec![1, 10, 0]);
}

#[test]
fn selection_is_ignored_when_disabled() {
    let mut controller = TableController::client(item_columns(), items(5), 10);
    controller.toggle_row_selection("1");
    controller.set_page_selection(true);
    assert!(!controller.selection_enabled());
    assert!(controller.selected_keys().is_empty());
}

#[test]
fn toolbar_actions_route_through_controller() {
    let mut controller = TableController::client(item_columns(), items(12), 10);
    let mut visibility = ColumnVisibility::default();
    let filterables = vec![
        FilterableColumn::text("color", "Color"),
        FilterableColumn::boolean("active", "Statuses"),
    ];

    let outcome = apply_toolbar_action(
        &mut controller,
        &mut visibility,
        &filterables,
        ToolbarAction::Filter {
            id: "active".to_string(),
            raw: "false".to_string(),
        },
    );
    assert!(outcome.error.is_none());
    assert_eq!(controller.total(), 3);

    let outcome = apply_toolbar_action(
        &mut controller,
        &mut visibility,
        &filterables,
        ToolbarAction::Filter {
            id: "active".to_string(),
            raw: "maybe".to_string(),
        },
    );
    assert!(matches!(
        outcome.error,
        Some(FilterInputError::UnknownOption { .. })
    ));

    let _ = apply_toolbar_action(
        &mut controller,
        &mut visibility,
        &filterables,
        ToolbarAction::Filter {
            id: "active".to_string(),
            raw: ALL_OPTION_VALUE.to_string(),
        },
    );
    assert!(controller.column_filters().is_empty());

    let outcome = apply_toolbar_action(
        &mut controller,
        &mut visibility,
        &filterables,
        ToolbarAction::ToggleColumn("name".to_string()),
    );
    assert!(!outcome.visibility_changed, "always-visible columns stay on");
    let outcome = apply_toolbar_action(
        &mut controller,
        &mut visibility,
        &filterables,
        ToolbarAction::ToggleColumn("price".to_string()),
    );
    assert!(outcome.visibility_changed);
    assert!(!visibility.is_visible("price"));
    assert_eq!(controller.state(), &QueryState::new(10), "visibility is not query state");

    let view = ToolbarView::new(
        Some("Items".to_string()),
        "Search…",
        "",
        controller.state(),
        &filterables,
        controller.columns(),
        &visibility,
    );
    assert_eq!(view.active_filter_count(), 0);
    assert!(!view.columns[2].visible);
}

#[test]
fn client_rows_filter_sort_and_paginate() {
    let columns = item_columns();
    let data = items(30);
    let mut state = QueryState::new(4);
    state.global_filter = "ITEM 1".to_string();
    state.sorting = vec![ColumnSort::desc("name")];

    let page = compute_page(&columns, &data, &state);
    assert_eq!(page.total, 10);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.rows[0].name, "Item 19");

    state.pagination.page_index = 2;
    let page = compute_page(&columns, &data, &state);
    assert_eq!(page.rows.len(), 2);
}

#[test]
fn cell_values_display_and_compare() {
    assert_eq!(CellValue::Boolean(true).display(), "Yes");
    assert_eq!(CellValue::Number(12.0).display(), "12");
    assert_eq!(CellValue::Number(9.5).display(), "9.50");
    assert!(CellValue::Empty.sort_cmp(&CellValue::text("a")).is_lt());
    assert!(CellValue::Integer(2)
        .sort_cmp(&CellValue::Number(10.0))
        .is_lt());
    let date = NaiveDate::from_ymd_opt(2024, 5, 31).expect("valid date");
    let stamp = date.and_hms_opt(8, 30, 0).expect("valid time");
    assert!(CellValue::DateTime(stamp).matches_filter(&FilterValue::Date(date)));
    assert_eq!(CellValue::DateTime(stamp).display(), "2024-05-31 08:30");
}

#[test]
fn query_context_parses_and_displays() {
    for context in [
        QueryContext::Admin,
        QueryContext::Shop { shop_id: 4 },
        QueryContext::Tenant { owner_id: 9 },
    ] {
        let parsed: QueryContext = context.to_string().parse().expect("context should parse");
        assert_eq!(parsed, context);
    }
    assert_eq!(
        " Shop : 12 ".parse::<QueryContext>().ok(),
        Some(QueryContext::Shop { shop_id: 12 })
    );
    assert!("warehouse:1".parse::<QueryContext>().is_err());
    assert!("shop:x".parse::<QueryContext>().is_err());
}

#[test]
fn mutation_slots_are_exclusive_per_kind() {
    let mut mutations = MutationState::default();

    mutations
        .claim(MutationKind::Delete, "p1")
        .expect("first delete should claim the slot");
    let err = mutations
        .claim(MutationKind::Delete, "p2")
        .expect_err("second delete should be refused");
    assert_eq!(
        err,
        SlotError::Busy {
            kind: MutationKind::Delete,
            busy_id: "p1".to_string()
        }
    );

    mutations
        .claim(MutationKind::Toggle, "p2")
        .expect("other kinds stay independent");
    assert!(mutations.row_busy("p1"));
    assert!(mutations.row_action_state("p1").disabled);
    assert_eq!(mutations.busy_kind("p2"), Some(MutationKind::Toggle));
    assert!(!mutations.row_busy("p3"));

    mutations.release(MutationKind::Delete, "p2");
    assert!(mutations.row_busy("p1"), "release by another row is ignored");
    mutations.release(MutationKind::Delete, "p1");
    mutations.release(MutationKind::Toggle, "p2");
    assert!(mutations.is_idle());
}

#[test]
fn edit_dialog_flow_claims_and_releases_update_slot() {
    let mut page = EntityPageState::new();
    page.open_edit(5).expect("idle row should open");
    assert_eq!(page.row_state(5), RowState::DialogOpen);

    let ticket = page.begin_submit().expect("submit should claim the slot");
    assert_eq!(ticket.kind, MutationKind::Update);
    assert!(page.is_submitting());
    assert_eq!(page.row_state(5), RowState::Updating);
    assert!(matches!(page.begin_submit(), Err(PageError::Slot(_))));
    assert_eq!(page.begin_toggle(5), Err(PageError::RowBusy("5".to_string())));

    assert!(page.finish(&ticket, Ok("Saved".to_string())));
    assert_eq!(page.mode, PageMode::Idle);
    assert!(page.mutations.is_idle());
    let notice = page.notice.clone().expect("notice should be set");
    assert_eq!(notice.level, NoticeLevel::Success);
    page.dismiss_notice();
    assert!(page.notice.is_none());
}

#[test]
fn create_uses_new_row_key_and_failure_returns_to_idle() {
    let mut page = EntityPageState::new();
    assert!(matches!(page.begin_submit(), Err(PageError::NoDialog)));

    page.open_create();
    assert_eq!(page.dialog_target(), Some(DialogTarget::Create));
    let ticket = page.begin_submit().expect("create should claim the slot");
    assert_eq!(ticket.row_key, NEW_ROW_KEY);

    page.cancel();
    assert_eq!(page.mutations.creating_id.as_deref(), Some(NEW_ROW_KEY));
    page.open_create();
    assert!(!page.finish(&ticket, Err("sku already exists".to_string())));
    assert_eq!(page.mode, PageMode::Idle);
    assert!(page.mutations.is_idle());
    assert_eq!(
        page.notice.as_ref().map(|notice| notice.level),
        Some(NoticeLevel::Error)
    );
}

#[test]
fn second_delete_waits_for_the_first() {
    let mut page = EntityPageState::new();
    page.request_delete(3, "Sun Hat").expect("delete dialog should open");
    let first = page.confirm_delete().expect("delete should claim the slot");
    assert!(page.is_deleting());
    assert_eq!(page.row_state(3), RowState::Deleting);
    assert!(page.open_edit(3).is_err());

    page.request_delete(4, "Beanie").expect("another row can ask");
    assert!(matches!(page.confirm_delete(), Err(PageError::Slot(_))));
    assert_eq!(page.row_state(4), RowState::ConfirmOpen);

    assert!(page.finish(&first, Ok("Deleted Sun Hat".to_string())));
    assert_eq!(
        page.mode,
        PageMode::ConfirmDelete {
            id: 4,
            label: "Beanie".to_string()
        },
        "finishing row 3 leaves row 4's dialog open"
    );
    page.confirm_delete().expect("slot is free again");
}

#[test]
fn init_db_creates_required_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("nested").join("app.sqlite");

    let result = init_db(&db_path);
    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
             ('shop','product','category','brand','attribute','tag','tax_rate','coupon','column_visibility')",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");
    assert_eq!(table_count, 9, "required tables should exist");

    assert!(init_db(&db_path).is_ok(), "init_db should be idempotent");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn seed_fills_empty_db_once() {
    let (temp_dir, db_path) = seeded_db("seed");

    assert!(!seed_demo_catalog(&db_path).expect("second seed should succeed"));

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let count = |sql: &str| -> i64 {
        conn.query_row(sql, [], |row| row.get(0))
            .expect("count query should succeed")
    };
    assert_eq!(count("SELECT COUNT(*) FROM shop"), 3);
    assert_eq!(count("SELECT COUNT(*) FROM product"), 36);
    assert_eq!(count("SELECT COUNT(*) FROM product WHERE shop_id = 1"), 25);
    assert_eq!(count("SELECT COUNT(*) FROM coupon"), 6);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn product_page_query_sorts_searches_and_filters() {
    let (temp_dir, db_path) = seeded_db("product-page");

    let mut params = shop_params(1, 10);
    let page = query_entity_page::<Product>(&db_path, &params).expect("page query should succeed");
    assert_eq!(page.total, 25);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.rows.len(), 10);
    assert_eq!(page.rows[0].sku, "S1-001");
    assert_eq!(page.rows[0].category_name.as_deref(), Some("Apparel"));

    params.page_index = 2;
    let last = query_entity_page::<Product>(&db_path, &params).expect("last page should load");
    assert_eq!(last.rows.len(), 5);

    params.page_index = 0;
    params.sorting = vec![ColumnSort::desc("price")];
    let sorted = query_entity_page::<Product>(&db_path, &params).expect("sorted page should load");
    assert_eq!(sorted.rows[0].name, "Camp Mug");

    params.sorting.clear();
    params.global_filter = "shoe".to_string();
    let searched = query_entity_page::<Product>(&db_path, &params).expect("search should load");
    assert_eq!(searched.total, 2);

    params.global_filter.clear();
    params.column_filters = vec![ColumnFilter::new(
        "category",
        FilterValue::Select("apparel".to_string()),
    )];
    let by_category = query_entity_page::<Product>(&db_path, &params).expect("filter should load");
    assert_eq!(by_category.total, 7);

    params.column_filters = vec![ColumnFilter::new("status", FilterValue::Boolean(false))];
    let inactive = query_entity_page::<Product>(&db_path, &params).expect("filter should load");
    assert_eq!(inactive.total, 4);
    assert!(inactive.rows.iter().all(|row| !row.is_active));

    params.column_filters = vec![ColumnFilter::new("price", FilterValue::Number(9.5))];
    let by_price = query_entity_page::<Product>(&db_path, &params).expect("filter should load");
    assert_eq!(by_price.total, 1);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn query_context_scopes_rows() {
    let (temp_dir, db_path) = seeded_db("scope");
    let total_for = |context: QueryContext| -> u64 {
        let params = FetchParams::from_state(&QueryState::new(10), context);
        query_entity_page::<Product>(&db_path, &params)
            .expect("page query should succeed")
            .total
    };

    assert_eq!(total_for(QueryContext::Admin), 36);
    assert_eq!(total_for(QueryContext::Shop { shop_id: 2 }), 5);
    assert_eq!(total_for(QueryContext::Tenant { owner_id: 1 }), 30);
    assert_eq!(total_for(QueryContext::Tenant { owner_id: 2 }), 6);
    assert_eq!(total_for(QueryContext::Tenant { owner_id: 99 }), 0);

    let lookups = load_lookups(&db_path, QueryContext::Tenant { owner_id: 1 })
        .expect("lookups should load");
    assert_eq!(lookups.shops.len(), 2);
    assert_eq!(lookups.categories.len(), 8);
    assert_eq!(lookups.tax_rates.len(), 4);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn unknown_column_is_a_validation_error() {
    let (temp_dir, db_path) = seeded_db("invalid-column");
    let repo = Arc::new(SqliteRepo::new(&db_path));

    let mut params = shop_params(1, 10);
    params.sorting = vec![ColumnSort::asc("password")];
    let products: &dyn CatalogRepository<Product> = &*repo;
    assert!(matches!(
        products.query_page(&params),
        Err(RepoError::InvalidQuery(_))
    ));

    let fetcher = repo.fetcher::<Product>();
    let err = fetcher
        .fetch(params)
        .await
        .expect_err("unknown sort column should be rejected");
    assert!(matches!(err, FetchError::Validation(_)));

    let mut params = shop_params(1, 10);
    params.column_filters = vec![ColumnFilter::new(
        "price",
        FilterValue::Text("cheap".to_string()),
    )];
    assert!(matches!(
        fetcher.fetch(params).await,
        Err(FetchError::Validation(_))
    ));

    let mut params = shop_params(1, 10);
    params.page_size = 0;
    assert!(matches!(
        products.query_page(&params),
        Err(RepoError::InvalidQuery(_))
    ));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn product_crud_maps_storage_errors() {
    let (temp_dir, db_path) = seeded_db("product-crud");
    let repo = SqliteRepo::new(&db_path);
    let products: &dyn CatalogRepository<Product> = &repo;

    let input = ProductInput {
        sku: " S1-900 ".to_string(),
        name: "Camp Stove".to_string(),
        description: "Two burners".to_string(),
        price: 79.0,
        stock: 4,
        category_id: Some(1),
        brand_id: None,
        tax_rate_id: None,
        is_active: true,
    };
    let created = products.create(1, input.clone()).expect("create should succeed");
    assert_eq!(created.sku, "S1-900");
    assert_eq!(created.category_name.as_deref(), Some("Apparel"));

    let duplicate = ProductInput {
        sku: "S1-001".to_string(),
        ..input.clone()
    };
    assert!(matches!(
        products.create(1, duplicate),
        Err(RepoError::Conflict(_))
    ));
    products
        .create(2, ProductInput {
            sku: "S1-901".to_string(),
            ..input.clone()
        })
        .expect("another shop may reuse the shape");

    let updated = products
        .update(
            created.id,
            ProductInput {
                price: 69.0,
                ..input.clone()
            },
        )
        .expect("update should succeed");
    assert_eq!(updated.price, 69.0);

    let toggled = products
        .set_active(created.id, false)
        .expect("toggle should succeed");
    assert!(!toggled.is_active);

    products.delete(created.id).expect("delete should succeed");
    assert_eq!(
        products.get(created.id),
        Err(RepoError::NotFound {
            entity: "product",
            id: created.id
        })
    );
    assert!(matches!(
        products.update(9_999, input),
        Err(RepoError::NotFound { id: 9_999, .. })
    ));
    assert!(matches!(
        products.delete(9_999),
        Err(RepoError::NotFound { .. })
    ));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn edit_service_runs_tag_mutations() {
    let (temp_dir, db_path) = seeded_db("edit-service");
    let repo = Arc::new(SqliteRepo::new(&db_path));
    let service = EditService::<Tag>::new(repo.clone());

    let created = service
        .create(
            2,
            TagInput {
                name: "Gift Idea!".to_string(),
                slug: String::new(),
                is_active: true,
            },
        )
        .await
        .expect("create should succeed");
    assert_eq!(created.slug, "gift-idea");
    assert_eq!(created.shop_id, 2);

    let toggled = service
        .set_active(created.id, false)
        .await
        .expect("toggle should succeed");
    assert!(!toggled.is_active);

    let clash = service
        .update(
            created.id,
            TagInput {
                name: "New arrival".to_string(),
                slug: String::new(),
                is_active: true,
            },
        )
        .await;
    assert!(matches!(clash, Err(RepoError::Conflict(_))));

    service.delete(created.id).await.expect("delete should succeed");
    assert!(matches!(
        service.delete(created.id).await,
        Err(RepoError::NotFound { entity: "tag", .. })
    ));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn column_visibility_persists_per_table() {
    let temp_dir = unique_test_dir("visibility");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    init_db(&db_path).expect("init_db should succeed");

    let mut visibility = BTreeMap::new();
    visibility.insert("brand".to_string(), false);
    visibility.insert("price".to_string(), true);
    upsert_column_visibility(&db_path, "products", &visibility).expect("save should succeed");
    upsert_column_visibility(&db_path, "coupons", &BTreeMap::from([("usage".to_string(), false)]))
        .expect("save should succeed");

    let loaded = load_column_visibility(&db_path, "products").expect("load should succeed");
    assert_eq!(loaded, visibility);

    let replacement = BTreeMap::from([("brand".to_string(), true)]);
    upsert_column_visibility(&db_path, "products", &replacement).expect("save should succeed");
    let loaded = load_column_visibility(&db_path, "products").expect("load should succeed");
    assert_eq!(loaded, replacement);
    assert_eq!(
        load_column_visibility(&db_path, "coupons")
            .expect("load should succeed")
            .len(),
        1
    );
    assert!(load_column_visibility(&db_path, "tags")
        .expect("load should succeed")
        .is_empty());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_import_inserts_and_updates_by_sku() {
    let (temp_dir, db_path) = seeded_db("import");
    let csv = "sku,name,price,stock,category,brand,active\n\
               S1-001,Merino Base Layer v2,12.5,8,apparel,Trailhead,yes\n\
               NEW-1,Camp Stove,45,3,Cooking,Ember,\n\
               NEW-2,Fuel Canister,6,30,Cooking,Ember,no\n";

    let summary = import_products_from_reader(&db_path, 1, csv.as_bytes())
        .expect("import should succeed");
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.categories_created, 1);
    assert_eq!(summary.brands_created, 1);
    assert_eq!(summary.rows(), 3);

    let mut params = shop_params(1, 50);
    let page = query_entity_page::<Product>(&db_path, &params).expect("page should load");
    assert_eq!(page.total, 27);

    params.global_filter = "v2".to_string();
    let page = query_entity_page::<Product>(&db_path, &params).expect("search should load");
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].price, 12.5);

    params.global_filter = "Fuel".to_string();
    let page = query_entity_page::<Product>(&db_path, &params).expect("search should load");
    assert!(!page.rows[0].is_active);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_import_rolls_back_on_bad_row() {
    let (temp_dir, db_path) = seeded_db("import-rollback");
    let csv = "sku,name,price\nX-1,Good Row,5\nX-2,Bad Row,abc\n";

    let err = import_products_from_reader(&db_path, 1, csv.as_bytes())
        .expect_err("bad price should fail");
    assert!(format!("{err:#}").contains("line 3"));

    let page = query_entity_page::<Product>(&db_path, &shop_params(1, 50))
        .expect("page should load");
    assert_eq!(page.total, 25, "nothing from the failed file should land");

    let missing_header = "name,price\nNo Sku,5\n";
    assert!(import_products_from_reader(&db_path, 1, missing_header.as_bytes()).is_err());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_export_writes_visible_columns_in_order() {
    let columns = item_columns();
    let data = items(2);
    let mut visibility = ColumnVisibility::default();
    visibility.set("color", false);
    let visible = visibility.visible_columns(&columns);
    let rows: Vec<&Item> = data.iter().collect();

    let mut sink = Vec::new();
    let written = write_view_csv(&mut sink, &visible, &rows).expect("export should succeed");
    assert_eq!(written, 2);

    let text = String::from_utf8(sink).expect("csv should be utf-8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Name,Price,Active", "Item 00,0.50,Yes", "Item 01,37.50,Yes"]);
}

#[test]
fn config_parses_toml_and_applies_overrides() {
    let raw = r#"
        log_filter = "debug"
        default_page_size = 20
        seed_demo_data = false

        [context]
        scope = "shop"
        shop_id = 2
    "#;
    let mut config = AppConfig::from_toml_str(raw).expect("config should parse");
    assert_eq!(config.default_page_size, 20);
    assert_eq!(config.context, QueryContext::Shop { shop_id: 2 });
    assert!(!config.seed_demo_data);
    assert_eq!(config.search_debounce_ms, 250, "missing keys use defaults");

    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_PAGE_SIZE, "50"),
        (ENV_CONTEXT, "tenant:7"),
        (ENV_LOG, "   "),
    ]);
    config
        .apply_overrides(|key| env.get(key).map(|value| value.to_string()))
        .expect("overrides should apply");
    assert_eq!(config.default_page_size, 50);
    assert_eq!(config.context, QueryContext::Tenant { owner_id: 7 });
    assert_eq!(config.log_filter, "debug", "blank overrides are ignored");

    let zero: HashMap<&str, &str> = HashMap::from([(ENV_PAGE_SIZE, "0")]);
    assert!(config
        .apply_overrides(|key| zero.get(key).map(|value| value.to_string()))
        .is_err());
    assert!(AppConfig::from_toml_str("default_page_size = 0").is_err());
}

#[test]
fn config_file_missing_means_defaults() {
    let temp_dir = unique_test_dir("config");
    let config =
        AppConfig::from_file(&temp_dir.join("config.toml")).expect("missing file is not an error");
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.context, QueryContext::Admin);
    assert_eq!(config.default_page_size, 10);
}

#[test]
fn rust_log_overrides_configured_filter() {
    assert_eq!(filter_directives("info", Some("debug".to_string())), "debug");
    assert_eq!(filter_directives(" warn ", Some("  ".to_string())), "warn");
    assert_eq!(filter_directives("info", None), "info");
    assert!(build_filter("info,marketplace_admin=debug").is_ok());
}

#[test]
fn product_form_blocks_submit_until_valid() {
    let lookups = Lookups {
        categories: vec![(1, "Apparel".to_string())],
        ..Lookups::default()
    };
    let fields = Product::form_fields(&lookups);
    let mut form = FormState::new(&fields, Product::form_values(None));
    assert_eq!(form.value("stock"), "0");
    assert_eq!(form.value("is_active"), "true");

    form.set_value(&fields, "price", "abc");
    assert!(form.error("price").is_none(), "untouched fields stay quiet");
    form.blur(&fields, "price");
    assert_eq!(form.error("price"), Some("Price must be a number"));

    assert!(matches!(form.submit(&fields), Err(FormError::Invalid(3))));

    form.set_value(&fields, "sku", "S1-777");
    form.set_value(&fields, "name", "Trail Mix");
    form.set_value(&fields, "price", "3.25");
    form.set_value(&fields, "category_id", "42");
    assert_eq!(form.error("category_id"), Some("Category has an unknown option"));
    form.set_value(&fields, "category_id", "1");

    let values = form.submit(&fields).expect("valid form should submit");
    let input = Product::input_from_form(&values).expect("values should convert");
    assert_eq!(input.sku, "S1-777");
    assert_eq!(input.price, 3.25);
    assert_eq!(input.stock, 0);
    assert_eq!(input.category_id, Some(1));
    assert_eq!(input.brand_id, None);
    assert!(input.is_active);
}

#[test]
fn conversion_errors_land_on_their_field() {
    let fields = TaxRate::form_fields(&Lookups::default());
    let mut form = FormState::new(&fields, TaxRate::form_values(None));
    form.set_value(&fields, "name", "Standard");
    form.set_value(&fields, "country", "u1");
    form.set_value(&fields, "rate", "7");

    let values = form.submit(&fields).expect("field checks pass");
    let err = TaxRate::input_from_form(&values).expect_err("country must be letters");
    form.record_error(&err);
    assert!(form.error("country").is_some());
    assert!(form.has_errors());

    let ok = TaxRate::input_from_form(&values.clone().with("country", "de"))
        .expect("two letters should convert");
    assert_eq!(ok.country, "DE");
}

#[test]
fn coupon_form_enforces_discount_rules() {
    let base = Coupon::form_values(None)
        .with("code", "spring10")
        .with("amount", "10")
        .with("starts_at", "2024-03-01")
        .with("expires_at", "2024-05-31");

    let input = Coupon::input_from_form(&base).expect("valid coupon should convert");
    assert_eq!(input.code, "SPRING10");
    assert_eq!(input.discount_kind, DiscountKind::Percent);
    assert_eq!(input.usage_limit, None);

    let too_much = Coupon::input_from_form(&base.clone().with("amount", "150"));
    assert!(matches!(
        too_much,
        Err(FormError::InvalidValue { ref field, .. }) if field == "amount"
    ));
    Coupon::input_from_form(&base.clone().with("amount", "150").with("discount_kind", "fixed"))
        .expect("fixed discounts may exceed 100");

    let backwards = Coupon::input_from_form(&base.clone().with("expires_at", "2024-01-01"));
    assert!(matches!(
        backwards,
        Err(FormError::InvalidValue { ref field, .. }) if field == "expires_at"
    ));

    let negative = Coupon::input_from_form(&base.with("usage_limit", "-1"));
    assert!(matches!(
        negative,
        Err(FormError::InvalidValue { ref field, .. }) if field == "usage_limit"
    ));
}

#[test]
fn shop_field_only_when_creating_outside_a_shop() {
    let lookups = Lookups {
        shops: vec![(1, "Northwind".to_string()), (2, "Harbor".to_string())],
        ..Lookups::default()
    };

    let admin_create = dialog_fields::<Tag>(&lookups, QueryContext::Admin, Some(DialogTarget::Create));
    assert_eq!(admin_create[0].name, SHOP_FIELD);
    assert!(admin_create[0].required);

    let admin_edit =
        dialog_fields::<Tag>(&lookups, QueryContext::Admin, Some(DialogTarget::Edit(3)));
    assert!(admin_edit.iter().all(|field| field.name != SHOP_FIELD));

    let shop_create = dialog_fields::<Tag>(
        &lookups,
        QueryContext::Shop { shop_id: 1 },
        Some(DialogTarget::Create),
    );
    assert!(shop_create.iter().all(|field| field.name != SHOP_FIELD));

    assert_eq!(
        create_shop_id(QueryContext::Shop { shop_id: 3 }, &FormValues::new()),
        Ok(3)
    );
    assert_eq!(
        create_shop_id(
            QueryContext::Admin,
            &FormValues::new().with(SHOP_FIELD, "2")
        ),
        Ok(2)
    );
    assert!(create_shop_id(QueryContext::Tenant { owner_id: 1 }, &FormValues::new()).is_err());
}

#[test]
fn scope_switcher_lists_shops_and_current_tenant() {
    let shops = vec![(1, "Northwind".to_string()), (2, "Harbor".to_string())];

    let admin = context_options(&shops, QueryContext::Admin);
    let values: Vec<&str> = admin.iter().map(|option| option.value.as_str()).collect();
    assert_eq!(values, vec!["admin", "shop:1", "shop:2"]);
    assert_eq!(admin[1].label, "Shop: Northwind");

    let tenant = context_options(&shops, QueryContext::Tenant { owner_id: 7 });
    assert_eq!(tenant.len(), 4);
    assert_eq!(tenant[3].value, "tenant:7");
    assert_eq!(tenant[3].label, "Owner #7");
}

#[test]
fn helpers_normalize_user_text() {
    assert_eq!(
        accept_extensions("png, .JPG, ,svg"),
        vec!["png".to_string(), "jpg".to_string(), "svg".to_string()]
    );
    assert_eq!(slugify("  Best   Seller! 2024 "), "best-seller-2024");
    assert_eq!(
        split_values("S, m, M , ,L"),
        vec!["S".to_string(), "m".to_string(), "L".to_string()]
    );
}

#[test]
fn table_header_cells_are_sticky() {
    let style = table_header_cell_style();
    assert!(style.contains("position: sticky"));
    assert!(style.contains("top: 0"));
}

#[test]
fn search_debounce_lets_only_latest_ticket_through() {
    let mut debounce = SearchDebounce::new(250);
    let first = debounce.input("sh");
    let second = debounce.input("shoe");

    assert!(!debounce.is_current(&first));
    assert!(debounce.is_current(&second));
    assert_eq!(debounce.latest(), "shoe");
    assert_eq!(debounce.delay(), Some(std::time::Duration::from_millis(250)));

    debounce.reset();
    assert!(!debounce.is_current(&second));
    assert_eq!(debounce.latest(), "");
    assert!(SearchDebounce::new(0).delay().is_none());
}

#[test]
fn database_initializes_once() {
    let temp_dir = unique_test_dir("database");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let database = Database::initialize(&db_path).expect("first initialize should succeed");
    assert_eq!(database.path(), db_path.as_path());
    let fetched = Database::get().expect("get after initialize should succeed");
    assert_eq!(fetched.repo().db_path, db_path);

    assert_eq!(
        Database::initialize(&temp_dir.join("other.sqlite")).err(),
        Some(DatabaseError::AlreadyInitialized(db_path.clone()))
    );
    assert!(!temp_dir.join("other.sqlite").exists());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn open_ended_adapter_keeps_next_enabled_until_an_empty_page() {
    let data = Arc::new(items(15));
    let fetcher: Arc<dyn TableFetcher<Item>> = Arc::new(fetcher_fn(move |params: FetchParams| {
        let data = data.clone();
        async move {
            let rows: Vec<Item> = data
                .iter()
                .skip(params.offset())
                .take(params.page_size)
                .cloned()
                .collect();
            Ok::<_, FetchError>(FetchResult::open_ended(rows))
        }
    }));
    let (mut controller, chrome) =
        TableOptions::server(item_columns(), fetcher, QueryContext::Admin).into_parts();
    let visibility = ColumnVisibility::default();

    let first = controller.refetch().expect("server mode should issue a fetch");
    assert_eq!(controller.commit(first.execute().await), CommitStatus::Applied);
    assert_eq!(controller.page_count(), PAGE_COUNT_UNKNOWN);
    let view = table_snapshot(&controller, &visibility, &chrome, "");
    assert!(view.pagination.can_next);
    assert!(!view.pagination.can_last);
    assert_eq!(view.pagination.page_of_label(), None);
    assert_eq!(view.pagination.summary(), "Showing 1–10");
    assert!(controller.last_page().is_none(), "no last page while the count is unknown");

    let second = controller.next_page().expect("next should fetch");
    assert_eq!(controller.commit(second.execute().await), CommitStatus::Applied);
    let view = table_snapshot(&controller, &visibility, &chrome, "");
    assert_eq!(view.grid.rows().len(), 5);
    assert!(view.pagination.can_next, "a short page does not prove the end");
    assert_eq!(view.pagination.summary(), "Showing 11–15");

    let third = controller.next_page().expect("next should still fetch");
    assert_eq!(controller.commit(third.execute().await), CommitStatus::Applied);
    let view = table_snapshot(&controller, &visibility, &chrome, "");
    assert_eq!(
        view.grid.body,
        GridBody::Empty {
            colspan: 4,
            message: EMPTY_MESSAGE
        }
    );
    assert_eq!(view.pagination.page_label(), "Page 3");
    assert!(view.pagination.can_previous);
    assert_eq!(view.pagination.summary(), "Showing 0");
}

#[test]
fn replacing_client_data_clamps_page_and_clears_selection() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let listener: SelectionListener<Item> = Box::new(move |rows: &[&Item]| {
        sink.borrow_mut().push(rows.len());
    });
    let (mut controller, _) = TableOptions::client(item_columns(), items(25))
        .row_selection(Some(listener))
        .into_parts();

    assert!(controller.set_page_index(2).is_none());
    controller.toggle_row_selection("20");
    controller.set_data(items(12));

    assert_eq!(controller.state().pagination.page_index, 1);
    assert!(controller.selected_keys().is_empty());
    assert_eq!(row_keys(&controller.page_rows()), ["10", "11"]);
    assert_eq!(*seen.borrow(), vec![1, 0]);

    let mut server = server_controller(5);
    server.set_data(items(3));
    assert_eq!(server.total(), 0, "server rows only change through commit");
}

#[test]
fn table_options_apply_defaults_and_overrides() {
    let (controller, chrome) = TableOptions::client(item_columns(), items(3)).into_parts();
    assert!(!controller.is_server_mode());
    assert!(!controller.selection_enabled());
    assert_eq!(controller.state().pagination.page_size, 10);
    assert_eq!(chrome.global_filter_placeholder, "Search…");
    assert_eq!(chrome.persist_key, None);
    assert_eq!(chrome.load_error("disk full"), "Could not load rows: disk full");

    let (controller, chrome) =
        TableOptions::server(item_columns(), item_fetcher(items(3)), QueryContext::Tenant { owner_id: 4 })
            .page_size(20)
            .row_selection(None)
            .title("Products")
            .placeholder("Search products…")
            .persist_as("products")
            .debounce_ms(250)
            .with_row_actions()
            .into_parts();
    assert!(controller.is_server_mode());
    assert!(controller.selection_enabled());
    assert_eq!(controller.context(), Some(QueryContext::Tenant { owner_id: 4 }));
    assert_eq!(controller.state().pagination.page_size, 20);
    assert_eq!(chrome.persist_key, Some("products"));
    assert_eq!(chrome.search_debounce_ms, 250);
    assert_eq!(chrome.load_error("disk full"), "Could not load products: disk full");

    let view = table_snapshot(&controller, &ColumnVisibility::default(), &chrome, "hat");
    assert_eq!(view.toolbar.title.as_deref(), Some("Products"));
    assert_eq!(view.toolbar.search_placeholder, "Search products…");
    assert_eq!(view.toolbar.search_value, "hat");
    assert!(view.grid.chrome.selection);
    assert!(view.grid.chrome.row_actions);
    assert!(view.pagination.show_refresh);
}

#[test]
fn shops_table_pages_loaded_rows_in_memory() {
    let (temp_dir, db_path) = seeded_db("shops");

    let shops = load_shops(&db_path, QueryContext::Admin).expect("shops should load");
    let listed: Vec<(&str, i64)> = shops
        .iter()
        .map(|shop| (shop.name.as_str(), shop.product_count))
        .collect();
    assert_eq!(
        listed,
        [
            ("Harbor Home Goods", 5),
            ("Northwind Outfitters", 25),
            ("Summit Electronics", 6)
        ]
    );
    assert_eq!(
        load_shops(&db_path, QueryContext::Tenant { owner_id: 1 })
            .expect("tenant shops should load")
            .len(),
        2
    );
    let scoped = load_shops(&db_path, QueryContext::Shop { shop_id: 3 }).expect("shop should load");
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].owner_id, 2);

    let (mut controller, chrome) = TableOptions::client(shop_columns(), Vec::new())
        .page_size(2)
        .filterable(shop_filterables())
        .title("Shops")
        .into_parts();
    controller.set_data(shops);
    assert_eq!(controller.total(), 3);
    assert_eq!(controller.page_count(), 2);

    assert!(controller.toggle_sort("product_count").is_none());
    let names: Vec<&str> = controller
        .page_rows()
        .iter()
        .map(|shop| shop.name.as_str())
        .collect();
    assert_eq!(names, ["Harbor Home Goods", "Summit Electronics"]);

    let mut visibility = ColumnVisibility::default();
    let outcome = apply_toolbar_action(
        &mut controller,
        &mut visibility,
        &chrome.filterable_columns,
        ToolbarAction::Filter {
            id: "owner_id".to_string(),
            raw: "1".to_string(),
        },
    );
    assert!(outcome.request.is_none());
    assert_eq!(controller.total(), 2);

    let view = table_snapshot(&controller, &visibility, &chrome, "");
    assert!(!view.pagination.show_refresh);
    assert!(!view.grid.chrome.selection);
    assert!(!view.grid.chrome.row_actions);
    assert_eq!(view.toolbar.filters.len(), 2);
    assert_eq!(chrome.load_error("locked"), "Could not load shops: locked");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn row_with_a_toggle_in_flight_cannot_be_deleted_or_saved() {
    let mut page = EntityPageState::new();
    page.request_delete(5, "Rain Jacket").expect("delete dialog should open");
    let toggle = page.begin_toggle(5).expect("toggle uses its own slot");

    assert_eq!(
        page.confirm_delete(),
        Err(PageError::RowBusy("5".to_string()))
    );
    assert!(!page.is_deleting());
    assert!(page.mutations.deleting_id.is_none());

    assert!(page.finish(&toggle, Ok("Deactivated Rain Jacket".to_string())));
    let delete = page.confirm_delete().expect("row is free once the toggle settles");
    assert!(page.finish(&delete, Ok("Deleted Rain Jacket".to_string())));

    page.open_edit(7).expect("edit dialog should open");
    let toggle = page.begin_toggle(7).expect("toggle while the dialog is open");
    assert_eq!(page.begin_submit(), Err(PageError::RowBusy("7".to_string())));
    assert!(page.mutations.updating_id.is_none());
    assert!(page.finish(&toggle, Ok("Activated".to_string())));
    page.begin_submit().expect("submit goes through after the toggle");
}

#[test]
fn csv_import_rejects_non_finite_prices() {
    let (temp_dir, db_path) = seeded_db("import-non-finite");

    for price in ["NaN", "inf"] {
        let csv = format!("sku,name,price\nX-9,Odd Price,{price}\n");
        let err = import_products_from_reader(&db_path, 1, csv.as_bytes())
            .expect_err("non-finite price should fail");
        let message = format!("{err:#}");
        assert!(message.contains("line 2: invalid price"), "{message}");
    }

    let page = query_entity_page::<Product>(&db_path, &shop_params(1, 50))
        .expect("page should load");
    assert_eq!(page.total, 25);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}
