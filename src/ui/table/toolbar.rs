use chrono::NaiveDate;

use crate::domain::entities::column::{ColumnDef, ColumnVisibility};
use crate::domain::entities::table::{FilterValue, QueryState, TableRow};
use crate::usecase::services::table_controller::{FetchRequest, TableController};

/// Dropdown value meaning "no filter on this column".
pub const ALL_OPTION_VALUE: &str = "__all__";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

pub fn dropdown_label(options: &[DropdownOption], selected: Option<&str>) -> String {
    selected
        .and_then(|value| options.iter().find(|opt| opt.value == value))
        .or_else(|| options.first())
        .map(|opt| opt.label.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Number,
    Date,
    Boolean,
    Select(Vec<DropdownOption>),
}

/// A column the toolbar exposes as its own filter control. `id` must match a
/// column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterableColumn {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterInputError {
    #[error("{label}: `{raw}` is not a number")]
    NotANumber { label: &'static str, raw: String },
    #[error("{label}: `{raw}` is not a date (YYYY-MM-DD)")]
    NotADate { label: &'static str, raw: String },
    #[error("{label}: unknown option `{raw}`")]
    UnknownOption { label: &'static str, raw: String },
    #[error("no filterable column `{0}`")]
    UnknownColumn(String),
}

impl FilterableColumn {
    pub fn text(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            kind: FilterKind::Text,
        }
    }

    pub fn number(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            kind: FilterKind::Number,
        }
    }

    pub fn date(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            kind: FilterKind::Date,
        }
    }

    pub fn boolean(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            kind: FilterKind::Boolean,
        }
    }

    pub fn select(id: &'static str, label: &'static str, options: Vec<DropdownOption>) -> Self {
        Self {
            id,
            label,
            kind: FilterKind::Select(options),
        }
    }

    pub fn all_label(&self) -> String {
        format!("All {}", self.label.to_lowercase())
    }

    pub fn is_dropdown(&self) -> bool {
        matches!(self.kind, FilterKind::Select(_) | FilterKind::Boolean)
    }

    /// "All <label>" first, then the column's options.
    pub fn dropdown_options(&self) -> Vec<DropdownOption> {
        let all = DropdownOption::new(ALL_OPTION_VALUE, self.all_label());
        match &self.kind {
            FilterKind::Select(options) => std::iter::once(all)
                .chain(options.iter().cloned())
                .collect(),
            FilterKind::Boolean => vec![
                all,
                DropdownOption::new("true", "Active"),
                DropdownOption::new("false", "Inactive"),
            ],
            FilterKind::Text | FilterKind::Number | FilterKind::Date => Vec::new(),
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self.kind {
            FilterKind::Number => "number",
            FilterKind::Date => "date",
            _ => "text",
        }
    }

    /// `Ok(None)` clears the column's filter.
    pub fn parse_input(&self, raw: &str) -> Result<Option<FilterValue>, FilterInputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_OPTION_VALUE {
            return Ok(None);
        }
        let value = match &self.kind {
            FilterKind::Text => FilterValue::Text(raw.to_string()),
            FilterKind::Number => FilterValue::Number(trimmed.parse::<f64>().map_err(|_| {
                FilterInputError::NotANumber {
                    label: self.label,
                    raw: raw.to_string(),
                }
            })?),
            FilterKind::Date => FilterValue::Date(
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
                    FilterInputError::NotADate {
                        label: self.label,
                        raw: raw.to_string(),
                    }
                })?,
            ),
            FilterKind::Boolean => match trimmed {
                "true" => FilterValue::Boolean(true),
                "false" => FilterValue::Boolean(false),
                _ => {
                    return Err(FilterInputError::UnknownOption {
                        label: self.label,
                        raw: raw.to_string(),
                    })
                }
            },
            FilterKind::Select(options) => {
                if !options.iter().any(|option| option.value == trimmed) {
                    return Err(FilterInputError::UnknownOption {
                        label: self.label,
                        raw: raw.to_string(),
                    });
                }
                FilterValue::Select(trimmed.to_string())
            }
        };
        Ok(Some(value))
    }

    pub fn current_input(&self, value: Option<&FilterValue>) -> String {
        match value {
            None => {
                if self.is_dropdown() {
                    ALL_OPTION_VALUE.to_string()
                } else {
                    String::new()
                }
            }
            Some(FilterValue::Boolean(flag)) => flag.to_string(),
            Some(other) => other.as_display(),
        }
    }
}

pub fn find_filterable<'a>(
    filterables: &'a [FilterableColumn],
    id: &str,
) -> Option<&'a FilterableColumn> {
    filterables.iter().find(|column| column.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    Search(String),
    Filter { id: String, raw: String },
    ClearFilters,
    ToggleColumn(String),
    SetPageSize(usize),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    Refresh,
    ToggleSort(String),
}

#[must_use]
pub struct ActionOutcome<T> {
    pub request: Option<FetchRequest<T>>,
    pub visibility_changed: bool,
    pub error: Option<FilterInputError>,
}

impl<T> ActionOutcome<T> {
    fn fetch(request: Option<FetchRequest<T>>) -> Self {
        Self {
            request,
            visibility_changed: false,
            error: None,
        }
    }
}

/// Translates one chrome action into controller calls. Column visibility is
/// render-only and never touches the query state.
pub fn apply_toolbar_action<T: TableRow + Send + 'static>(
    controller: &mut TableController<T>,
    visibility: &mut ColumnVisibility,
    filterables: &[FilterableColumn],
    action: ToolbarAction,
) -> ActionOutcome<T> {
    match action {
        ToolbarAction::Search(text) => ActionOutcome::fetch(controller.set_global_filter(|_| text)),
        ToolbarAction::Filter { id, raw } => {
            let Some(column) = find_filterable(filterables, &id) else {
                return ActionOutcome {
                    request: None,
                    visibility_changed: false,
                    error: Some(FilterInputError::UnknownColumn(id)),
                };
            };
            match column.parse_input(&raw) {
                Ok(value) => ActionOutcome::fetch(controller.set_column_filter(&id, value)),
                Err(err) => ActionOutcome {
                    request: None,
                    visibility_changed: false,
                    error: Some(err),
                },
            }
        }
        ToolbarAction::ClearFilters => {
            ActionOutcome::fetch(controller.set_column_filters(|_| Vec::new()))
        }
        ToolbarAction::ToggleColumn(id) => {
            let hideable = controller
                .columns()
                .iter()
                .any(|column| column.id == id && column.hideable);
            if hideable {
                visibility.toggle(&id);
            }
            ActionOutcome {
                request: None,
                visibility_changed: hideable,
                error: None,
            }
        }
        ToolbarAction::SetPageSize(size) => ActionOutcome::fetch(controller.set_page_size(size)),
        ToolbarAction::FirstPage => ActionOutcome::fetch(controller.set_page_index(0)),
        ToolbarAction::PreviousPage => ActionOutcome::fetch(controller.previous_page()),
        ToolbarAction::NextPage => ActionOutcome::fetch(controller.next_page()),
        ToolbarAction::LastPage => ActionOutcome::fetch(controller.last_page()),
        ToolbarAction::Refresh => ActionOutcome::fetch(controller.refetch()),
        ToolbarAction::ToggleSort(id) => {
            let sortable = controller
                .columns()
                .iter()
                .any(|column| column.id == id && column.sortable);
            if !sortable {
                return ActionOutcome::fetch(None);
            }
            ActionOutcome::fetch(controller.toggle_sort(&id))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterControlKind {
    Input { input_type: &'static str },
    Dropdown(Vec<DropdownOption>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FilterControlKind,
    pub value: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub id: &'static str,
    pub label: &'static str,
    pub visible: bool,
    pub hideable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarView {
    pub title: Option<String>,
    pub search_placeholder: String,
    pub search_value: String,
    pub filters: Vec<FilterControl>,
    pub columns: Vec<ColumnToggle>,
}

impl ToolbarView {
    pub fn new<T>(
        title: Option<String>,
        search_placeholder: impl Into<String>,
        search_value: impl Into<String>,
        state: &QueryState,
        filterables: &[FilterableColumn],
        columns: &[ColumnDef<T>],
        visibility: &ColumnVisibility,
    ) -> Self {
        let filters = filterables
            .iter()
            .map(|column| {
                let stored = state.column_filter(column.id);
                let kind = if column.is_dropdown() {
                    FilterControlKind::Dropdown(column.dropdown_options())
                } else {
                    FilterControlKind::Input {
                        input_type: column.input_type(),
                    }
                };
                FilterControl {
                    id: column.id,
                    label: column.label,
                    kind,
                    value: column.current_input(stored),
                    active: stored.is_some(),
                }
            })
            .collect();

        let columns = columns
            .iter()
            .map(|column| ColumnToggle {
                id: column.id,
                label: column.header,
                visible: !column.hideable || visibility.is_visible(column.id),
                hideable: column.hideable,
            })
            .collect();

        Self {
            title,
            search_placeholder: search_placeholder.into(),
            search_value: search_value.into(),
            filters,
            columns,
        }
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.iter().filter(|filter| filter.active).count()
    }
}
