use dioxus::prelude::*;

use crate::ui::styles::{button_style, popover_style};
use crate::ui::table::toolbar::{dropdown_label, ColumnToggle, DropdownOption};

/// Which popover is open. Only one at a time per window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropdownId {
    Filter(&'static str),
    Columns,
    Context,
}

fn toggle_open(
    id: DropdownId,
    point: (f64, f64),
    mut open_dropdown: Signal<Option<DropdownId>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
) {
    if open_dropdown() == Some(id) {
        open_dropdown.set(None);
        return;
    }
    dropdown_pos.set(Some((point.0, point.1 + 24.0)));
    open_dropdown.set(Some(id));
}

#[component]
pub fn DropdownSelect(
    id: DropdownId,
    label: String,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    mut open_dropdown: Signal<Option<DropdownId>>,
    dropdown_pos: Signal<Option<(f64, f64)>>,
    on_select: EventHandler<String>,
) -> Element {
    let is_open = open_dropdown() == Some(id);
    let selected_label = dropdown_label(&options, selected.as_deref());
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            if !label.is_empty() {
                span { "{label}" }
            }
            button {
                style: "{button_style(false)}",
                onclick: move |event| {
                    event.stop_propagation();
                    let point = event.client_coordinates();
                    toggle_open(id, (point.x, point.y), open_dropdown, dropdown_pos);
                },
                "{selected_label}"
            }
        }

        if is_open {
            div {
                style: "{popover_style(left, top)}",
                onclick: move |event| event.stop_propagation(),
                {options.iter().map(|opt| {
                    let value = opt.value.clone();
                    let label = opt.label.clone();
                    let is_selected = selected.as_deref() == Some(value.as_str());
                    let background = if is_selected { "#eef4ff" } else { "transparent" };
                    rsx!(
                        div {
                            key: "{value}",
                            style: "padding: 8px 10px; cursor: pointer; background: {background};",
                            onclick: move |_| {
                                on_select.call(value.clone());
                                open_dropdown.set(None);
                            },
                            "{label}"
                        }
                    )
                })}
            }
        }
    }
}

#[component]
pub fn ColumnVisibilityDropdown(
    columns: Vec<ColumnToggle>,
    open_dropdown: Signal<Option<DropdownId>>,
    dropdown_pos: Signal<Option<(f64, f64)>>,
    on_toggle: EventHandler<&'static str>,
) -> Element {
    let id = DropdownId::Columns;
    let is_open = open_dropdown() == Some(id);
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));

    rsx! {
        button {
            style: "{button_style(false)}",
            onclick: move |event| {
                event.stop_propagation();
                let point = event.client_coordinates();
                toggle_open(id, (point.x, point.y), open_dropdown, dropdown_pos);
            },
            "Columns"
        }

        if is_open {
            div {
                style: "{popover_style(left, top)}",
                onclick: move |event| event.stop_propagation(),
                {columns.iter().map(|column| {
                    let column_id = column.id;
                    let checked = column.visible;
                    let disabled = !column.hideable;
                    let header = column.label;
                    rsx!(
                        label {
                            key: "{column_id}",
                            style: "display: flex; align-items: center; gap: 8px; padding: 6px 4px; cursor: pointer;",
                            input {
                                r#type: "checkbox",
                                checked: checked,
                                disabled: disabled,
                                onclick: move |_| on_toggle.call(column_id),
                            }
                            span { "{header}" }
                        }
                    )
                })}
            }
        }
    }
}
