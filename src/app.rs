use dioxus::prelude::*;

use crate::domain::entities::catalog::EntityKind;
use crate::domain::entities::table::QueryContext;
use crate::ui::components::dropdown::{DropdownId, DropdownSelect};
use crate::ui::pages::{
    AttributesPage, BrandsPage, CategoriesPage, CouponsPage, ProductsPage, ShopsPage, TagsPage,
    TaxesPage,
};
use crate::ui::state::app_state::{AdminTab, AppServices, AppState};
use crate::ui::styles::root_container_style;
use crate::ui::table::toolbar::DropdownOption;

/// Scope switcher entries: everything, each shop, and the current scope if it
/// is a tenant not otherwise listed.
pub fn context_options(shops: &[(i64, String)], current: QueryContext) -> Vec<DropdownOption> {
    let mut options = vec![DropdownOption::new(QueryContext::Admin.to_string(), "All shops (admin)")];
    for (id, name) in shops {
        options.push(DropdownOption::new(
            QueryContext::Shop { shop_id: *id }.to_string(),
            format!("Shop: {name}"),
        ));
    }
    if let QueryContext::Tenant { owner_id } = current {
        options.push(DropdownOption::new(current.to_string(), format!("Owner #{owner_id}")));
    }
    options
}

fn tab_style(active: bool) -> &'static str {
    if active {
        "padding: 6px 14px; border: none; border-bottom: 2px solid #2b6cb0; background: transparent; font-weight: 600; cursor: pointer;"
    } else {
        "padding: 6px 14px; border: none; border-bottom: 2px solid transparent; background: transparent; color: #555; cursor: pointer;"
    }
}

#[component]
pub fn App() -> Element {
    let services = use_context::<AppServices>();
    let state = AppState::new(services.initial_context);
    let app = use_context_provider(|| state);
    let mut active = app.active;
    let mut context = app.context;
    let mut open_dropdown = app.open_dropdown;

    let settings = services.settings.clone();
    let shops = use_resource(move || {
        let settings = settings.clone();
        async move {
            settings
                .lookups(QueryContext::Admin)
                .await
                .map(|lookups| lookups.shops)
                .unwrap_or_default()
        }
    });

    let current = context();
    let shop_list = shops.read().clone().unwrap_or_default();
    let options = context_options(&shop_list, current);
    let scope_key = current.to_string();

    let body = match active() {
        AdminTab::Shops => rsx! { ShopsPage { key: "{scope_key}", context: current } },
        AdminTab::Catalog(kind) => match kind {
            EntityKind::Product => rsx! { ProductsPage { key: "{scope_key}", context: current } },
            EntityKind::Category => rsx! { CategoriesPage { key: "{scope_key}", context: current } },
            EntityKind::Brand => rsx! { BrandsPage { key: "{scope_key}", context: current } },
            EntityKind::Attribute => rsx! { AttributesPage { key: "{scope_key}", context: current } },
            EntityKind::Tag => rsx! { TagsPage { key: "{scope_key}", context: current } },
            EntityKind::TaxRate => rsx! { TaxesPage { key: "{scope_key}", context: current } },
            EntityKind::Coupon => rsx! { CouponsPage { key: "{scope_key}", context: current } },
        },
    };

    rsx! {
        div {
            style: "{root_container_style()}",
            onclick: move |_| open_dropdown.set(None),
            div { style: "display: flex; align-items: center; gap: 4px; border-bottom: 1px solid #ddd; margin-bottom: 10px;",
                for tab in AdminTab::all() {
                    button {
                        key: "{tab.key()}",
                        style: tab_style(active() == tab),
                        onclick: move |_| active.set(tab),
                        "{tab.label()}"
                    }
                }
                div { style: "margin-left: auto; padding-bottom: 4px;",
                    DropdownSelect {
                        id: DropdownId::Context,
                        label: "Scope".to_string(),
                        options,
                        selected: Some(scope_key.clone()),
                        open_dropdown: app.open_dropdown,
                        dropdown_pos: app.dropdown_pos,
                        on_select: move |value: String| {
                            if let Ok(next) = value.parse::<QueryContext>() {
                                tracing::info!(context = %next, "switched scope");
                                context.set(next);
                            }
                        },
                    }
                }
            }
            {body}
        }
    }
}
