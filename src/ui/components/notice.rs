use dioxus::prelude::*;

use crate::usecase::services::entity_page::{Notice, NoticeLevel};

#[component]
pub fn NoticeBanner(notice: Notice, on_dismiss: EventHandler<()>) -> Element {
    let (background, color) = match notice.level {
        NoticeLevel::Success => ("#ecfdf3", "#067647"),
        NoticeLevel::Error => ("#fef3f2", "#b42318"),
    };

    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 8px; padding: 8px 12px; margin-bottom: 8px; border-radius: 6px; background: {background}; color: {color};",
            span { style: "flex: 1;", "{notice.message}" }
            button {
                style: "border: none; background: transparent; color: inherit; cursor: pointer;",
                onclick: move |_| on_dismiss.call(()),
                "✕"
            }
        }
    }
}
