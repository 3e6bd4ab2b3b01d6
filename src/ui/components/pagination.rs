use dioxus::prelude::*;

use crate::ui::styles::button_style;
use crate::ui::table::pagination::PaginationView;
use crate::ui::table::toolbar::ToolbarAction;

#[component]
pub fn TablePagination(view: PaginationView, on_action: EventHandler<ToolbarAction>) -> Element {
    let page_label = view.page_label();
    let page_of = view.page_of_label().unwrap_or_default();
    let summary = view.summary();
    let current_size = view.page_size;

    rsx! {
        div { style: "display: flex; gap: 8px; align-items: center; margin-top: 12px;",
            span { style: "color: #555;", "{summary}" }
            div { style: "margin-left: auto; display: flex; gap: 8px; align-items: center;",
                span { "Rows per page" }
                select {
                    value: "{current_size}",
                    onchange: move |event| {
                        if let Ok(size) = event.value().parse::<usize>() {
                            on_action.call(ToolbarAction::SetPageSize(size));
                        }
                    },
                    for size in view.page_sizes.iter().copied() {
                        option {
                            key: "{size}",
                            value: "{size}",
                            selected: size == current_size,
                            "{size}"
                        }
                    }
                }
                button {
                    style: "{button_style(false)}",
                    disabled: !view.can_previous,
                    onclick: move |_| on_action.call(ToolbarAction::FirstPage),
                    "«"
                }
                button {
                    style: "{button_style(false)}",
                    disabled: !view.can_previous,
                    onclick: move |_| on_action.call(ToolbarAction::PreviousPage),
                    "Previous"
                }
                span { "{page_label} {page_of}" }
                button {
                    style: "{button_style(false)}",
                    disabled: !view.can_next,
                    onclick: move |_| on_action.call(ToolbarAction::NextPage),
                    "Next"
                }
                button {
                    style: "{button_style(false)}",
                    disabled: !view.can_last,
                    onclick: move |_| on_action.call(ToolbarAction::LastPage),
                    "»"
                }
                if view.show_refresh {
                    button {
                        style: "{button_style(false)}",
                        disabled: view.refresh_disabled,
                        onclick: move |_| on_action.call(ToolbarAction::Refresh),
                        if view.refresh_disabled { "Refreshing…" } else { "Refresh" }
                    }
                }
            }
        }
    }
}
