use dioxus::prelude::*;

use crate::domain::entities::catalog::{Lookups, Tag, TagInput};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::values::flag_value;
use crate::ui::form::{FormError, FormField, FormValues, Validator};
use crate::ui::pages::entity_page::entity_page;
use crate::ui::pages::{status_cell, EntityAdmin};
use crate::ui::table::toolbar::FilterableColumn;

impl EntityAdmin for Tag {
    const TITLE: &'static str = "Tags";
    const SEARCH_PLACEHOLDER: &'static str = "Search tags…";

    fn columns() -> Vec<ColumnDef<Self>> {
        vec![
            ColumnDef::new("name", "Name", |t: &Tag| CellValue::text(t.name.clone())).always_visible(),
            ColumnDef::new("slug", "Slug", |t: &Tag| CellValue::text(t.slug.clone())),
            ColumnDef::new("status", "Active", status_cell::<Tag>),
            ColumnDef::new("created_at", "Created", |t: &Tag| CellValue::DateTime(t.created_at)),
        ]
    }

    fn filterable_columns(_lookups: &Lookups) -> Vec<FilterableColumn> {
        vec![FilterableColumn::boolean("status", "Statuses")]
    }

    fn form_fields(_lookups: &Lookups) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name")
                .required()
                .validate(Validator::MaxLength(40)),
            FormField::text("slug", "Slug")
                .placeholder("generated from the name")
                .validate(Validator::MaxLength(40)),
            FormField::checkbox("is_active", "Active"),
        ]
    }

    fn form_values(row: Option<&Self>) -> FormValues {
        match row {
            Some(tag) => FormValues::new()
                .with("name", tag.name.clone())
                .with("slug", tag.slug.clone())
                .with("is_active", flag_value(tag.is_active)),
            None => FormValues::new().with("is_active", "true"),
        }
    }

    fn input_from_form(values: &FormValues) -> Result<TagInput, FormError> {
        Ok(TagInput {
            name: values.text("name"),
            slug: values.text("slug"),
            is_active: values.flag("is_active"),
        })
    }
}

#[component]
pub fn TagsPage(context: QueryContext) -> Element {
    entity_page::<Tag>(context)
}
