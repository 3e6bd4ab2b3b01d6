use std::collections::BTreeMap;
use std::fmt;

use crate::domain::entities::table::CellValue;

/// Static column description supplied by each page. Columns are fixed for the
/// lifetime of a table; only their visibility changes.
pub struct ColumnDef<T> {
    pub id: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub hideable: bool,
    pub accessor: fn(&T) -> CellValue,
}

impl<T> ColumnDef<T> {
    pub fn new(id: &'static str, header: &'static str, accessor: fn(&T) -> CellValue) -> Self {
        Self {
            id,
            header,
            sortable: true,
            hideable: true,
            accessor,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ColumnDef<T> {}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish()
    }
}

pub fn find_column<'a, T>(columns: &'a [ColumnDef<T>], id: &str) -> Option<&'a ColumnDef<T>> {
    columns.iter().find(|column| column.id == id)
}

/// Render-time visibility per column id. Absent ids are visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnVisibility {
    flags: BTreeMap<String, bool>,
}

impl ColumnVisibility {
    pub fn from_map(map: BTreeMap<String, bool>) -> Self {
        Self { flags: map }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(true)
    }

    pub fn set(&mut self, id: &str, visible: bool) {
        self.flags.insert(id.to_string(), visible);
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_visible(id);
        self.set(id, next);
        next
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    /// Keeps only known ids and forces non-hideable columns back on.
    pub fn normalized<T>(&self, columns: &[ColumnDef<T>]) -> ColumnVisibility {
        let mut normalized = BTreeMap::new();
        for column in columns {
            let visible = !column.hideable || self.is_visible(column.id);
            normalized.insert(column.id.to_string(), visible);
        }
        ColumnVisibility { flags: normalized }
    }

    pub fn visible_columns<'a, T>(&self, columns: &'a [ColumnDef<T>]) -> Vec<&'a ColumnDef<T>> {
        columns
            .iter()
            .filter(|column| !column.hideable || self.is_visible(column.id))
            .collect()
    }
}
