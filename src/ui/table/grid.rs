use std::collections::BTreeSet;

use crate::domain::entities::column::{ColumnDef, ColumnVisibility};
use crate::domain::entities::table::{CellValue, QueryState, SortDirection, TableRow};

pub const EMPTY_MESSAGE: &str = "No results";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

impl CellAlign {
    pub fn for_value(value: &CellValue) -> Self {
        match value {
            CellValue::Integer(_) | CellValue::Number(_) => CellAlign::Right,
            CellValue::Boolean(_) => CellAlign::Center,
            _ => CellAlign::Left,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            CellAlign::Left => "left",
            CellAlign::Center => "center",
            CellAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

impl HeaderCell {
    pub fn sort_indicator(&self) -> &'static str {
        match self.sort {
            Some(SortDirection::Asc) => " ▲",
            Some(SortDirection::Desc) => " ▼",
            None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub column_id: &'static str,
    pub text: String,
    pub align: CellAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub key: String,
    pub cells: Vec<GridCell>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridBody {
    Rows(Vec<GridRow>),
    /// Single placeholder row spanning every rendered column.
    Empty {
        colspan: usize,
        message: &'static str,
    },
}

/// Extra columns painted around the data columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridChrome {
    pub selection: bool,
    pub row_actions: bool,
}

impl GridChrome {
    fn extra_columns(self) -> usize {
        usize::from(self.selection) + usize::from(self.row_actions)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    pub headers: Vec<HeaderCell>,
    pub body: GridBody,
    pub chrome: GridChrome,
}

impl GridModel {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, GridBody::Empty { .. })
    }

    pub fn rows(&self) -> &[GridRow] {
        match &self.body {
            GridBody::Rows(rows) => rows,
            GridBody::Empty { .. } => &[],
        }
    }

    pub fn all_selected(&self) -> bool {
        let rows = self.rows();
        !rows.is_empty() && rows.iter().all(|row| row.selected)
    }
}

/// Lays out the current page. Rows arrive already paginated and are never
/// re-paginated here.
pub fn build_grid<T: TableRow>(
    columns: &[ColumnDef<T>],
    visibility: &ColumnVisibility,
    rows: &[&T],
    state: &QueryState,
    selected: &BTreeSet<String>,
    chrome: GridChrome,
) -> GridModel {
    let visible = visibility.visible_columns(columns);

    let headers = visible
        .iter()
        .map(|column| HeaderCell {
            id: column.id,
            label: column.header,
            sortable: column.sortable,
            sort: state.sort_for(column.id),
        })
        .collect::<Vec<_>>();

    let body = if rows.is_empty() {
        GridBody::Empty {
            colspan: (visible.len() + chrome.extra_columns()).max(1),
            message: EMPTY_MESSAGE,
        }
    } else {
        GridBody::Rows(
            rows.iter()
                .map(|row| {
                    let key = row.row_key();
                    let cells = visible
                        .iter()
                        .map(|column| {
                            let value = column.value(row);
                            GridCell {
                                column_id: column.id,
                                align: CellAlign::for_value(&value),
                                text: value.display(),
                            }
                        })
                        .collect();
                    GridRow {
                        selected: selected.contains(&key),
                        key,
                        cells,
                    }
                })
                .collect(),
        )
    };

    GridModel {
        headers,
        body,
        chrome,
    }
}
