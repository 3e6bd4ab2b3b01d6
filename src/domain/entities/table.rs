use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];
/// `page_count` value reported by adapters that cannot know the total up front.
pub const PAGE_COUNT_UNKNOWN: i64 = -1;

pub trait TableRow {
    fn row_key(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }

    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

pub type SortingState = Vec<ColumnSort>;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Select(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl FilterValue {
    /// Blank text values never make it into the filter set.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Text(text) | FilterValue::Select(text) => text.trim().is_empty(),
            FilterValue::Number(value) => value.is_nan(),
            FilterValue::Boolean(_) | FilterValue::Date(_) => false,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            FilterValue::Text(text) | FilterValue::Select(text) => text.clone(),
            FilterValue::Number(value) => format_number(*value),
            FilterValue::Boolean(value) => value.to_string(),
            FilterValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    pub id: String,
    pub value: FilterValue,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: FilterValue) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

pub type ColumnFilters = Vec<ColumnFilter>;

/// Drops blank values and collapses duplicate ids, keeping the last write in
/// the position of the first occurrence.
pub fn normalize_column_filters(filters: ColumnFilters) -> ColumnFilters {
    let mut normalized: ColumnFilters = Vec::with_capacity(filters.len());
    for filter in filters {
        if filter.value.is_blank() {
            normalized.retain(|existing| existing.id != filter.id);
            continue;
        }
        match normalized.iter_mut().find(|existing| existing.id == filter.id) {
            Some(existing) => existing.value = filter.value,
            None => normalized.push(filter),
        }
    }
    normalized
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    pub pagination: PaginationState,
    pub sorting: SortingState,
    pub column_filters: ColumnFilters,
    pub global_filter: String,
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            pagination: PaginationState::new(page_size),
            ..Self::default()
        }
    }

    pub fn column_filter(&self, id: &str) -> Option<&FilterValue> {
        self.column_filters
            .iter()
            .find(|filter| filter.id == id)
            .map(|filter| &filter.value)
    }

    pub fn sort_for(&self, id: &str) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|sort| sort.id == id)
            .map(ColumnSort::direction)
    }
}

/// Opaque scope tag threaded from the page to the adapter. The table never
/// inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum QueryContext {
    #[default]
    Admin,
    Shop {
        shop_id: i64,
    },
    Tenant {
        owner_id: i64,
    },
}

impl QueryContext {
    pub fn shop_id(&self) -> Option<i64> {
        match self {
            QueryContext::Shop { shop_id } => Some(*shop_id),
            QueryContext::Admin | QueryContext::Tenant { .. } => None,
        }
    }
}

impl fmt::Display for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryContext::Admin => write!(f, "admin"),
            QueryContext::Shop { shop_id } => write!(f, "shop:{shop_id}"),
            QueryContext::Tenant { owner_id } => write!(f, "tenant:{owner_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid context `{0}` (expected admin, shop:<id> or tenant:<id>)")]
pub struct ParseContextError(pub String);

impl FromStr for QueryContext {
    type Err = ParseContextError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("admin") {
            return Ok(QueryContext::Admin);
        }
        let (scope, id) = trimmed
            .split_once(':')
            .ok_or_else(|| ParseContextError(value.to_string()))?;
        let id = id
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseContextError(value.to_string()))?;
        match scope.trim().to_ascii_lowercase().as_str() {
            "shop" => Ok(QueryContext::Shop { shop_id: id }),
            "tenant" => Ok(QueryContext::Tenant { owner_id: id }),
            _ => Err(ParseContextError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchParams {
    pub page_index: usize,
    pub page_size: usize,
    pub sorting: SortingState,
    pub column_filters: ColumnFilters,
    pub global_filter: String,
    pub context: QueryContext,
}

impl FetchParams {
    pub fn from_state(state: &QueryState, context: QueryContext) -> Self {
        Self {
            page_index: state.pagination.page_index,
            page_size: state.pagination.page_size,
            sorting: state.sorting.clone(),
            column_filters: state.column_filters.clone(),
            global_filter: state.global_filter.clone(),
            context,
        }
    }

    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<T> {
    pub rows: Vec<T>,
    pub page_count: i64,
    pub total: u64,
}

impl<T> FetchResult<T> {
    pub fn from_total(rows: Vec<T>, total: u64, page_size: usize) -> Self {
        Self {
            rows,
            page_count: page_count_for(total, page_size),
            total,
        }
    }

    /// For sources that cannot count ahead of time.
    pub fn open_ended(rows: Vec<T>) -> Self {
        let total = rows.len() as u64;
        Self {
            rows,
            page_count: PAGE_COUNT_UNKNOWN,
            total,
        }
    }
}

pub fn page_count_for(total: u64, page_size: usize) -> i64 {
    let page_size = page_size.max(1) as u64;
    total.div_ceil(page_size) as i64
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        match value {
            Some(text) if !text.is_empty() => CellValue::Text(text.to_string()),
            _ => CellValue::Empty,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Number(_))
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Number(value) => format_number(*value),
            CellValue::Boolean(true) => "Yes".to_string(),
            CellValue::Boolean(false) => "No".to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(value) => value.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(value) => Some(*value as f64),
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Total order used by client-side sorting. Empty cells sort first.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Empty, _) => Ordering::Less,
            (_, CellValue::Empty) => Ordering::Greater,
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => self
                    .display()
                    .to_lowercase()
                    .cmp(&other.display().to_lowercase()),
            },
        }
    }

    pub fn matches_filter(&self, filter: &FilterValue) -> bool {
        match filter {
            FilterValue::Text(needle) => self
                .display()
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            FilterValue::Select(expected) => self.display().eq_ignore_ascii_case(expected.trim()),
            FilterValue::Number(expected) => self
                .as_f64()
                .is_some_and(|value| (value - expected).abs() < f64::EPSILON),
            FilterValue::Boolean(expected) => matches!(self, CellValue::Boolean(value) if value == expected),
            FilterValue::Date(expected) => match self {
                CellValue::Date(date) => date == expected,
                CellValue::DateTime(value) => value.date() == *expected,
                _ => false,
            },
        }
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
