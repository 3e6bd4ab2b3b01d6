use dioxus::prelude::*;

use crate::domain::entities::catalog::{split_values, Attribute, AttributeInput, Lookups};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::values::flag_value;
use crate::ui::form::{FieldContext, FormError, FormField, FormValues, Validator};
use crate::ui::pages::entity_page::entity_page;
use crate::ui::pages::{status_cell, EntityAdmin};
use crate::ui::table::toolbar::FilterableColumn;

/// Comma separated input with a chip preview of the parsed values.
fn render_values(field: &FieldContext) -> Element {
    let on_change = field.on_change;
    let chips = split_values(&field.value);
    let disabled = field.disabled;

    rsx! {
        div {
            input {
                r#type: "text",
                style: "width: 100%; padding: 6px 8px; box-sizing: border-box;",
                value: "{field.value}",
                placeholder: "S, M, L",
                disabled: disabled,
                oninput: move |event| on_change.call(event.value()),
            }
            div { style: "display: flex; flex-wrap: wrap; gap: 4px; margin-top: 6px;",
                for chip in chips {
                    span {
                        key: "{chip}",
                        style: "padding: 2px 8px; border-radius: 10px; background: #eef4ff; font-size: 12px;",
                        "{chip}"
                    }
                }
            }
        }
    }
}

impl EntityAdmin for Attribute {
    const TITLE: &'static str = "Attributes";
    const SEARCH_PLACEHOLDER: &'static str = "Search attributes or values…";

    fn columns() -> Vec<ColumnDef<Self>> {
        vec![
            ColumnDef::new("name", "Name", |a: &Attribute| CellValue::text(a.name.clone())).always_visible(),
            ColumnDef::new("values", "Values", |a: &Attribute| CellValue::text(a.values.join(", ")))
                .unsortable(),
            ColumnDef::new("status", "Active", status_cell::<Attribute>),
            ColumnDef::new("created_at", "Created", |a: &Attribute| {
                CellValue::DateTime(a.created_at)
            }),
        ]
    }

    fn filterable_columns(_lookups: &Lookups) -> Vec<FilterableColumn> {
        vec![
            FilterableColumn::text("values", "Value"),
            FilterableColumn::boolean("status", "Statuses"),
        ]
    }

    fn form_fields(_lookups: &Lookups) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name")
                .required()
                .validate(Validator::MaxLength(60)),
            FormField::custom("values", "Values", render_values).required(),
            FormField::checkbox("is_active", "Active"),
        ]
    }

    fn form_values(row: Option<&Self>) -> FormValues {
        let Some(attribute) = row else {
            return FormValues::new().with("is_active", "true");
        };
        FormValues::new()
            .with("name", attribute.name.clone())
            .with("values", attribute.values.join(", "))
            .with("is_active", flag_value(attribute.is_active))
    }

    fn input_from_form(values: &FormValues) -> Result<AttributeInput, FormError> {
        let parsed = split_values(&values.text("values"));
        values.ensure("values", !parsed.is_empty(), "Add at least one value")?;
        Ok(AttributeInput {
            name: values.text("name"),
            values: parsed,
            is_active: values.flag("is_active"),
        })
    }
}

#[component]
pub fn AttributesPage(context: QueryContext) -> Element {
    entity_page::<Attribute>(context)
}
