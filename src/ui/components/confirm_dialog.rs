use dioxus::prelude::*;

use crate::ui::styles::{button_style, modal_backdrop_style, modal_panel_style};

#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { style: "{modal_backdrop_style()}",
            div {
                style: "{modal_panel_style()}",
                onclick: move |event| event.stop_propagation(),
                h3 { style: "margin-top: 0;", "{title}" }
                p { "{message}" }
                div { style: "display: flex; justify-content: flex-end; gap: 8px;",
                    button {
                        style: "{button_style(false)}",
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        style: "{button_style(true)} background: #b42318; border-color: #b42318;",
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        if busy { "Deleting…" } else { "Delete" }
                    }
                }
            }
        }
    }
}
