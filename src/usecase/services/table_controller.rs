use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{
    normalize_column_filters, ColumnFilter, ColumnFilters, ColumnSort, FetchParams, FetchResult,
    FilterValue, PaginationState, QueryContext, QueryState, SortingState, TableRow,
};
use crate::usecase::ports::fetcher::{FetchError, TableFetcher};
use crate::usecase::services::client_rows::compute_page;

pub type SelectionListener<T> = Box<dyn FnMut(&[&T])>;

/// Where a table's rows come from. Without a server adapter the table runs in
/// client mode over the full dataset.
pub enum TableSource<T> {
    Server {
        fetcher: Arc<dyn TableFetcher<T>>,
        context: QueryContext,
    },
    Client(Vec<T>),
}

enum RowSource<T> {
    Client {
        data: Vec<T>,
    },
    Server {
        fetcher: Arc<dyn TableFetcher<T>>,
        context: QueryContext,
        rows: Vec<T>,
        page_count: i64,
        total: u64,
    },
}

struct RowSelection<T> {
    enabled: bool,
    keys: BTreeSet<String>,
    listener: Option<SelectionListener<T>>,
}

impl<T> Default for RowSelection<T> {
    fn default() -> Self {
        Self {
            enabled: false,
            keys: BTreeSet::new(),
            listener: None,
        }
    }
}

#[must_use = "a fetch request does nothing until it is executed and committed"]
pub struct FetchRequest<T> {
    seq: u64,
    snapshot: QueryState,
    params: FetchParams,
    fetcher: Arc<dyn TableFetcher<T>>,
}

impl<T: Send + 'static> FetchRequest<T> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }

    pub async fn execute(self) -> FetchOutcome<T> {
        let result = self.fetcher.fetch(self.params.clone()).await;
        FetchOutcome {
            seq: self.seq,
            snapshot: self.snapshot,
            result,
        }
    }
}

pub struct FetchOutcome<T> {
    pub seq: u64,
    pub snapshot: QueryState,
    pub result: Result<FetchResult<T>, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
    Applied,
    /// The query changed (or a newer result landed) while this one was in flight.
    Stale,
    Failed(FetchError),
}

pub struct TableController<T> {
    state: QueryState,
    columns: Vec<ColumnDef<T>>,
    source: RowSource<T>,
    is_fetching: bool,
    last_error: Option<String>,
    issued_seq: u64,
    applied_seq: u64,
    selection: RowSelection<T>,
}

fn page_rows_of<'a, T>(
    source: &'a RowSource<T>,
    columns: &[ColumnDef<T>],
    state: &QueryState,
) -> Vec<&'a T> {
    match source {
        RowSource::Client { data } => compute_page(columns, data, state).rows,
        RowSource::Server { rows, .. } => rows.iter().collect(),
    }
}

impl<T: TableRow + Send + 'static> TableController<T> {
    pub fn new(columns: Vec<ColumnDef<T>>, source: TableSource<T>, page_size: usize) -> Self {
        let source = match source {
            TableSource::Client(data) => RowSource::Client { data },
            TableSource::Server { fetcher, context } => RowSource::Server {
                fetcher,
                context,
                rows: Vec::new(),
                page_count: 0,
                total: 0,
            },
        };
        Self {
            state: QueryState::new(page_size),
            columns,
            source,
            is_fetching: false,
            last_error: None,
            issued_seq: 0,
            applied_seq: 0,
            selection: RowSelection::default(),
        }
    }

    pub fn client(columns: Vec<ColumnDef<T>>, data: Vec<T>, page_size: usize) -> Self {
        Self::new(columns, TableSource::Client(data), page_size)
    }

    pub fn server(
        columns: Vec<ColumnDef<T>>,
        fetcher: Arc<dyn TableFetcher<T>>,
        context: QueryContext,
        page_size: usize,
    ) -> Self {
        Self::new(columns, TableSource::Server { fetcher, context }, page_size)
    }

    pub fn with_row_selection(mut self, listener: Option<SelectionListener<T>>) -> Self {
        self.selection.enabled = true;
        self.selection.listener = listener;
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn column_filters(&self) -> &ColumnFilters {
        &self.state.column_filters
    }

    pub fn is_server_mode(&self) -> bool {
        matches!(self.source, RowSource::Server { .. })
    }

    pub fn context(&self) -> Option<QueryContext> {
        match &self.source {
            RowSource::Server { context, .. } => Some(*context),
            RowSource::Client { .. } => None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn page_rows(&self) -> Vec<&T> {
        page_rows_of(&self.source, &self.columns, &self.state)
    }

    pub fn total(&self) -> u64 {
        match &self.source {
            RowSource::Client { data } => compute_page(&self.columns, data, &self.state).total,
            RowSource::Server { total, .. } => *total,
        }
    }

    pub fn page_count(&self) -> i64 {
        match &self.source {
            RowSource::Client { data } => {
                compute_page(&self.columns, data, &self.state).page_count
            }
            RowSource::Server { page_count, .. } => *page_count,
        }
    }

    pub fn set_pagination(
        &mut self,
        update: impl FnOnce(PaginationState) -> PaginationState,
    ) -> Option<FetchRequest<T>> {
        let prev = self.state.pagination;
        let mut next = update(prev);
        next.page_size = next.page_size.max(1);
        if next.page_size != prev.page_size {
            next.page_index = 0;
        }
        let mut state = self.state.clone();
        state.pagination = next;
        self.transition(state)
    }

    pub fn set_sorting(
        &mut self,
        update: impl FnOnce(SortingState) -> SortingState,
    ) -> Option<FetchRequest<T>> {
        let mut state = self.state.clone();
        state.sorting = update(std::mem::take(&mut state.sorting));
        state.pagination.page_index = 0;
        self.transition(state)
    }

    pub fn set_column_filters(
        &mut self,
        update: impl FnOnce(ColumnFilters) -> ColumnFilters,
    ) -> Option<FetchRequest<T>> {
        let mut state = self.state.clone();
        state.column_filters =
            normalize_column_filters(update(std::mem::take(&mut state.column_filters)));
        state.pagination.page_index = 0;
        self.transition(state)
    }

    pub fn set_global_filter(
        &mut self,
        update: impl FnOnce(String) -> String,
    ) -> Option<FetchRequest<T>> {
        let mut state = self.state.clone();
        state.global_filter = update(std::mem::take(&mut state.global_filter));
        state.pagination.page_index = 0;
        self.transition(state)
    }

    pub fn set_page_index(&mut self, page_index: usize) -> Option<FetchRequest<T>> {
        self.set_pagination(|prev| PaginationState { page_index, ..prev })
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Option<FetchRequest<T>> {
        self.set_pagination(|_| PaginationState {
            page_index: 0,
            page_size,
        })
    }

    pub fn next_page(&mut self) -> Option<FetchRequest<T>> {
        self.set_pagination(|prev| PaginationState {
            page_index: prev.page_index + 1,
            ..prev
        })
    }

    pub fn previous_page(&mut self) -> Option<FetchRequest<T>> {
        self.set_pagination(|prev| PaginationState {
            page_index: prev.page_index.saturating_sub(1),
            ..prev
        })
    }

    /// No-op while the page count is unknown.
    pub fn last_page(&mut self) -> Option<FetchRequest<T>> {
        let page_count = self.page_count();
        if page_count <= 0 {
            return None;
        }
        self.set_page_index(page_count as usize - 1)
    }

    /// `None` (or a blank value) removes the column's entry entirely.
    pub fn set_column_filter(
        &mut self,
        id: &str,
        value: Option<FilterValue>,
    ) -> Option<FetchRequest<T>> {
        self.set_column_filters(|mut filters| {
            filters.retain(|filter| filter.id != id);
            if let Some(value) = value {
                filters.push(ColumnFilter::new(id, value));
            }
            filters
        })
    }

    pub fn toggle_sort(&mut self, id: &str) -> Option<FetchRequest<T>> {
        let next = next_sort(&self.state.sorting, id);
        self.set_sorting(|_| next)
    }

    /// Re-invokes the adapter for the unchanged state. `None` in client mode.
    pub fn refetch(&mut self) -> Option<FetchRequest<T>> {
        self.issue()
    }

    /// Replaces the dataset in client mode. Ignored in server mode. A page
    /// index past the new end is pulled back to the last page.
    pub fn set_data(&mut self, rows: Vec<T>) {
        let RowSource::Client { data } = &mut self.source else {
            return;
        };
        *data = rows;
        self.clear_selection();
        let page_count = self.page_count().max(1) as usize;
        if self.state.pagination.page_index >= page_count {
            self.state.pagination.page_index = page_count - 1;
        }
    }

    pub fn commit(&mut self, outcome: FetchOutcome<T>) -> CommitStatus {
        let FetchOutcome {
            seq,
            snapshot,
            result,
        } = outcome;

        if seq == self.issued_seq {
            self.is_fetching = false;
        }

        if snapshot != self.state || seq < self.applied_seq {
            debug!(seq, latest = self.issued_seq, "dropping stale fetch result");
            return CommitStatus::Stale;
        }

        match result {
            Ok(page) => {
                if let RowSource::Server {
                    rows,
                    page_count,
                    total,
                    ..
                } = &mut self.source
                {
                    debug!(
                        seq,
                        rows = page.rows.len(),
                        total = page.total,
                        page_count = page.page_count,
                        "applied fetch result"
                    );
                    *rows = page.rows;
                    *page_count = page.page_count;
                    *total = page.total;
                }
                self.applied_seq = seq;
                self.last_error = None;
                self.clear_selection();
                CommitStatus::Applied
            }
            Err(err) => {
                warn!(seq, error = %err, "table fetch failed; keeping last good page");
                self.last_error = Some(err.to_string());
                CommitStatus::Failed(err)
            }
        }
    }

    pub fn selection_enabled(&self) -> bool {
        self.selection.enabled
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selection.keys.contains(key)
    }

    pub fn selected_keys(&self) -> &BTreeSet<String> {
        &self.selection.keys
    }

    pub fn selected_rows(&self) -> Vec<&T> {
        self.page_rows()
            .into_iter()
            .filter(|row| self.selection.keys.contains(&row.row_key()))
            .collect()
    }

    pub fn toggle_row_selection(&mut self, key: &str) {
        if !self.selection.enabled {
            return;
        }
        if !self.selection.keys.remove(key) {
            self.selection.keys.insert(key.to_string());
        }
        self.notify_selection();
    }

    pub fn set_page_selection(&mut self, selected: bool) {
        if !self.selection.enabled {
            return;
        }
        let keys: BTreeSet<String> = if selected {
            self.page_rows().iter().map(|row| row.row_key()).collect()
        } else {
            BTreeSet::new()
        };
        self.selection.keys = keys;
        self.notify_selection();
    }

    fn transition(&mut self, next: QueryState) -> Option<FetchRequest<T>> {
        if next == self.state {
            return None;
        }
        self.state = next;
        self.clear_selection();
        self.issue()
    }

    fn issue(&mut self) -> Option<FetchRequest<T>> {
        let RowSource::Server {
            fetcher, context, ..
        } = &self.source
        else {
            return None;
        };

        self.issued_seq += 1;
        self.is_fetching = true;
        let params = FetchParams::from_state(&self.state, *context);
        debug!(
            seq = self.issued_seq,
            page_index = params.page_index,
            page_size = params.page_size,
            filters = params.column_filters.len(),
            search = %params.global_filter,
            context = %params.context,
            "enqueue table fetch"
        );
        Some(FetchRequest {
            seq: self.issued_seq,
            snapshot: self.state.clone(),
            params,
            fetcher: fetcher.clone(),
        })
    }

    fn clear_selection(&mut self) {
        if self.selection.keys.is_empty() {
            return;
        }
        self.selection.keys.clear();
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        let Self {
            selection,
            source,
            columns,
            state,
            ..
        } = self;
        let Some(listener) = selection.listener.as_mut() else {
            return;
        };
        let selected: Vec<&T> = page_rows_of(source, columns, state)
            .into_iter()
            .filter(|row| selection.keys.contains(&row.row_key()))
            .collect();
        listener(&selected);
    }
}

/// Single-column sort cycle: unsorted → ascending → descending → unsorted.
pub fn next_sort(sorting: &[ColumnSort], id: &str) -> SortingState {
    match sorting.first() {
        Some(current) if current.id == id && !current.desc => vec![ColumnSort::desc(id)],
        Some(current) if current.id == id => Vec::new(),
        _ => vec![ColumnSort::asc(id)],
    }
}
