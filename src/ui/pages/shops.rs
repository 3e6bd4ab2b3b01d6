use dioxus::prelude::*;

use crate::domain::entities::catalog::Shop;
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::components::table_view::{render_data_table, use_data_table};
use crate::ui::state::app_state::{AppServices, AppState};
use crate::ui::styles::button_style;
use crate::ui::table::toolbar::FilterableColumn;
use crate::ui::table::view::TableOptions;

pub fn shop_columns() -> Vec<ColumnDef<Shop>> {
    vec![
        ColumnDef::new("name", "Shop", |s: &Shop| CellValue::text(s.name.clone())).always_visible(),
        ColumnDef::new("owner_id", "Owner", |s: &Shop| CellValue::Integer(s.owner_id)),
        ColumnDef::new("product_count", "Products", |s: &Shop| {
            CellValue::Integer(s.product_count)
        }),
        ColumnDef::new("status", "Active", |s: &Shop| CellValue::Boolean(s.is_active)),
    ]
}

pub fn shop_filterables() -> Vec<FilterableColumn> {
    vec![
        FilterableColumn::number("owner_id", "Owner"),
        FilterableColumn::boolean("status", "Statuses"),
    ]
}

/// Shops in scope. The list is small, so it is loaded whole and paged,
/// sorted and filtered in memory.
#[component]
pub fn ShopsPage(context: QueryContext) -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();

    let table = use_data_table(|| {
        TableOptions::client(shop_columns(), Vec::new())
            .page_size(services.page_size)
            .filterable(shop_filterables())
            .title("Shops")
            .placeholder("Search shops…")
            .persist_as("shops")
    });

    let settings = services.settings.clone();
    let mut shops = use_resource(move || {
        let settings = settings.clone();
        async move { settings.shops(context).await }
    });

    use_effect(move || {
        let loaded = match &*shops.read() {
            Some(Ok(rows)) => rows.clone(),
            Some(Err(err)) => {
                let mut error = table.error;
                error.set(Some(format!("Could not load shops: {err}")));
                return;
            }
            None => return,
        };
        table.set_data(loaded);
    });

    rsx! {
        div { style: "display: flex; flex-direction: column; flex: 1; min-height: 0;",
            {render_data_table(
                table,
                app,
                Vec::new(),
                None,
                rsx! {
                    button {
                        style: "{button_style(false)}",
                        onclick: move |_| shops.restart(),
                        "Reload"
                    }
                },
            )}
        }
    }
}
