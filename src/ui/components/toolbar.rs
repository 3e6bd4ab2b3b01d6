use dioxus::prelude::*;

use crate::ui::components::dropdown::{ColumnVisibilityDropdown, DropdownId, DropdownSelect};
use crate::ui::styles::button_style;
use crate::ui::table::toolbar::{FilterControlKind, ToolbarAction, ToolbarView};

#[component]
pub fn TableToolbar(
    view: ToolbarView,
    open_dropdown: Signal<Option<DropdownId>>,
    dropdown_pos: Signal<Option<(f64, f64)>>,
    on_search: EventHandler<String>,
    on_action: EventHandler<ToolbarAction>,
    children: Element,
) -> Element {
    let active_filters = view.active_filter_count();

    rsx! {
        div { style: "display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-bottom: 8px;",
            if let Some(title) = view.title.clone() {
                h3 { style: "margin: 0 12px 0 0;", "{title}" }
            }
            input {
                r#type: "search",
                style: "padding: 4px 8px; min-width: 220px;",
                placeholder: "{view.search_placeholder}",
                value: "{view.search_value}",
                oninput: move |event| on_search.call(event.value()),
            }
            {view.filters.iter().map(|filter| {
                let id = filter.id;
                match &filter.kind {
                    FilterControlKind::Dropdown(options) => rsx!(
                        DropdownSelect {
                            key: "{id}",
                            id: DropdownId::Filter(id),
                            label: String::new(),
                            options: options.clone(),
                            selected: Some(filter.value.clone()),
                            open_dropdown,
                            dropdown_pos,
                            on_select: move |value: String| {
                                on_action.call(ToolbarAction::Filter { id: id.to_string(), raw: value });
                            },
                        }
                    ),
                    FilterControlKind::Input { input_type } => {
                        let input_type = *input_type;
                        let label = filter.label;
                        rsx!(
                            input {
                                key: "{id}",
                                r#type: "{input_type}",
                                style: "padding: 4px 8px; width: 140px;",
                                placeholder: "{label}",
                                value: "{filter.value}",
                                onchange: move |event| {
                                    on_action.call(ToolbarAction::Filter { id: id.to_string(), raw: event.value() });
                                },
                            }
                        )
                    }
                }
            })}
            if active_filters > 0 {
                button {
                    style: "{button_style(false)}",
                    onclick: move |_| on_action.call(ToolbarAction::ClearFilters),
                    "Reset ({active_filters})"
                }
            }
            ColumnVisibilityDropdown {
                columns: view.columns.clone(),
                open_dropdown,
                dropdown_pos,
                on_toggle: move |id: &'static str| on_action.call(ToolbarAction::ToggleColumn(id.to_string())),
            }
            div { style: "margin-left: auto; display: flex; gap: 8px;",
                {children}
            }
        }
    }
}
