use dioxus::prelude::*;

use crate::domain::entities::mutation::MutationKind;
use crate::ui::styles::{table_cell_style, table_container_style, table_header_cell_style};
use crate::ui::table::grid::{CellAlign, GridBody, GridModel};
use crate::ui::table::toolbar::ToolbarAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
    ToggleActive,
}

/// Per-row affordances, aligned with the grid's rows.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RowControls {
    pub busy: Option<MutationKind>,
    pub disabled: bool,
    pub active: bool,
}

impl RowControls {
    pub fn busy_label(&self) -> Option<&'static str> {
        self.busy.map(|kind| match kind {
            MutationKind::Create => "Saving…",
            MutationKind::Update => "Updating…",
            MutationKind::Delete => "Deleting…",
            MutationKind::Toggle => "Updating…",
        })
    }
}

#[component]
pub fn DataTable(
    model: GridModel,
    row_controls: Vec<RowControls>,
    fetching: bool,
    on_action: EventHandler<ToolbarAction>,
    on_row_action: Option<EventHandler<(String, RowAction)>>,
    on_toggle_row: EventHandler<String>,
    on_toggle_page: EventHandler<bool>,
) -> Element {
    let all_selected = model.all_selected();
    let selection = model.chrome.selection;
    let row_actions = model.chrome.row_actions;
    let opacity = if fetching { "0.55" } else { "1" };
    let row_action = move |key: String, action: RowAction| {
        if let Some(handler) = on_row_action {
            handler.call((key, action));
        }
    };

    let body = match &model.body {
        GridBody::Empty { colspan, message } => rsx! {
            tr {
                td {
                    colspan: "{colspan}",
                    style: "padding: 24px; text-align: center; color: #777;",
                    "{message}"
                }
            }
        },
        GridBody::Rows(rows) => rsx! {
            {rows.iter().enumerate().map(|(idx, row)| {
                let controls = row_controls.get(idx).cloned().unwrap_or_default();
                let key = row.key.clone();
                let key_for_select = key.clone();
                let key_for_edit = key.clone();
                let key_for_toggle = key.clone();
                let key_for_delete = key.clone();
                let row_style = if row.selected { "background: #eef4ff;" } else { "" };
                let toggle_label = if controls.active { "Deactivate" } else { "Activate" };
                let busy_label = controls.busy_label();
                let disabled = controls.disabled;
                rsx!(
                    tr {
                        key: "{key}",
                        style: "{row_style}",
                        if selection {
                            td { style: "{table_cell_style(CellAlign::Center)}",
                                input {
                                    r#type: "checkbox",
                                    checked: row.selected,
                                    onclick: move |_| on_toggle_row.call(key_for_select.clone()),
                                }
                            }
                        }
                        for cell in row.cells.iter() {
                            td {
                                key: "{cell.column_id}",
                                style: "{table_cell_style(cell.align)}",
                                "{cell.text}"
                            }
                        }
                        if row_actions {
                            td { style: "{table_cell_style(CellAlign::Left)} white-space: nowrap;",
                                if let Some(label) = busy_label {
                                    span { style: "color: #2b6cb0; margin-right: 8px;", "⟳ {label}" }
                                }
                                button {
                                    disabled: disabled,
                                    onclick: move |_| row_action(key_for_edit.clone(), RowAction::Edit),
                                    "Edit"
                                }
                                button {
                                    disabled: disabled,
                                    onclick: move |_| row_action(key_for_toggle.clone(), RowAction::ToggleActive),
                                    "{toggle_label}"
                                }
                                button {
                                    disabled: disabled,
                                    style: "color: #b42318;",
                                    onclick: move |_| row_action(key_for_delete.clone(), RowAction::Delete),
                                    "Delete"
                                }
                            }
                        }
                    }
                )
            })}
        },
    };

    rsx! {
        div {
            style: "{table_container_style()}",
            table { style: "border-collapse: collapse; width: 100%; background: #fff; opacity: {opacity};",
                thead {
                    tr {
                        if selection {
                            th { style: "{table_header_cell_style()}",
                                input {
                                    r#type: "checkbox",
                                    checked: all_selected,
                                    onclick: move |_| on_toggle_page.call(!all_selected),
                                }
                            }
                        }
                        for header in model.headers.iter().cloned() {
                            th {
                                key: "{header.id}",
                                style: "{table_header_cell_style()}",
                                if header.sortable {
                                    span {
                                        style: "cursor: pointer; user-select: none;",
                                        onclick: move |_| on_action.call(ToolbarAction::ToggleSort(header.id.to_string())),
                                        "{header.label}{header.sort_indicator()}"
                                    }
                                } else {
                                    "{header.label}"
                                }
                            }
                        }
                        if row_actions {
                            th { style: "{table_header_cell_style()}", "Actions" }
                        }
                    }
                }
                tbody {
                    {body}
                }
            }
        }
    }
}
