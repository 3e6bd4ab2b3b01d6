use crate::domain::entities::column::{find_column, ColumnDef};
use crate::domain::entities::table::{page_count_for, ColumnFilter, ColumnSort, QueryState};

#[derive(Debug)]
pub struct ClientPage<'a, T> {
    pub rows: Vec<&'a T>,
    pub total: u64,
    pub page_count: i64,
}

fn matches_global<T>(columns: &[ColumnDef<T>], row: &T, needle: &str) -> bool {
    columns
        .iter()
        .any(|column| column.value(row).display().to_lowercase().contains(needle))
}

fn matches_columns<T>(columns: &[ColumnDef<T>], row: &T, filters: &[ColumnFilter]) -> bool {
    filters.iter().all(|filter| match find_column(columns, &filter.id) {
        Some(column) => column.value(row).matches_filter(&filter.value),
        None => true,
    })
}

pub fn filter_rows<'a, T>(
    columns: &[ColumnDef<T>],
    data: &'a [T],
    state: &QueryState,
) -> Vec<&'a T> {
    let needle = state.global_filter.trim().to_lowercase();
    data.iter()
        .filter(|row| needle.is_empty() || matches_global(columns, row, &needle))
        .filter(|row| matches_columns(columns, row, &state.column_filters))
        .collect()
}

/// Stable multi-key sort; unknown or unsortable column ids are skipped.
pub fn sort_rows<T>(columns: &[ColumnDef<T>], rows: &mut [&T], sorting: &[ColumnSort]) {
    let keys: Vec<(&ColumnDef<T>, bool)> = sorting
        .iter()
        .filter_map(|sort| {
            find_column(columns, &sort.id)
                .filter(|column| column.sortable)
                .map(|column| (column, sort.desc))
        })
        .collect();
    if keys.is_empty() {
        return;
    }

    rows.sort_by(|a, b| {
        for (column, desc) in &keys {
            let ordering = column.value(a).sort_cmp(&column.value(b));
            let ordering = if *desc { ordering.reverse() } else { ordering };
            if ordering.is_ne() {
                return ordering;
            }
        }
        std::cmp::Ordering::Equal
    });
}

pub fn compute_page<'a, T>(
    columns: &[ColumnDef<T>],
    data: &'a [T],
    state: &QueryState,
) -> ClientPage<'a, T> {
    let mut rows = filter_rows(columns, data, state);
    sort_rows(columns, &mut rows, &state.sorting);

    let total = rows.len() as u64;
    let page_size = state.pagination.page_size.max(1);
    let rows = rows
        .into_iter()
        .skip(state.pagination.offset())
        .take(page_size)
        .collect();

    ClientPage {
        rows,
        total,
        page_count: page_count_for(total, page_size),
    }
}
