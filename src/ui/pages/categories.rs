use dioxus::prelude::*;

use crate::domain::entities::catalog::{Category, CategoryInput, Lookups};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::values::flag_value;
use crate::ui::form::{FormError, FormField, FormValues, Validator};
use crate::ui::pages::entity_page::entity_page;
use crate::ui::pages::{status_cell, EntityAdmin};
use crate::ui::table::toolbar::FilterableColumn;

impl EntityAdmin for Category {
    const TITLE: &'static str = "Categories";
    const SEARCH_PLACEHOLDER: &'static str = "Search categories…";

    fn columns() -> Vec<ColumnDef<Self>> {
        vec![
            ColumnDef::new("name", "Name", |c: &Category| CellValue::text(c.name.clone())).always_visible(),
            ColumnDef::new("slug", "Slug", |c: &Category| CellValue::text(c.slug.clone())),
            ColumnDef::new("description", "Description", |c: &Category| {
                CellValue::optional_text(Some(c.description.as_str()))
            })
            .unsortable(),
            ColumnDef::new("status", "Active", status_cell::<Category>),
            ColumnDef::new("created_at", "Created", |c: &Category| {
                CellValue::DateTime(c.created_at)
            }),
        ]
    }

    fn filterable_columns(_lookups: &Lookups) -> Vec<FilterableColumn> {
        vec![FilterableColumn::boolean("status", "Statuses")]
    }

    fn form_fields(_lookups: &Lookups) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name")
                .required()
                .validate(Validator::MaxLength(80)),
            FormField::text("slug", "Slug")
                .placeholder("generated from the name")
                .validate(Validator::MaxLength(80)),
            FormField::textarea("description", "Description"),
            FormField::checkbox("is_active", "Active"),
        ]
    }

    fn form_values(row: Option<&Self>) -> FormValues {
        let Some(category) = row else {
            return FormValues::new().with("is_active", "true");
        };
        FormValues::new()
            .with("name", category.name.clone())
            .with("slug", category.slug.clone())
            .with("description", category.description.clone())
            .with("is_active", flag_value(category.is_active))
    }

    fn input_from_form(values: &FormValues) -> Result<CategoryInput, FormError> {
        Ok(CategoryInput {
            name: values.text("name"),
            slug: values.text("slug"),
            description: values.text("description"),
            is_active: values.flag("is_active"),
        })
    }
}

#[component]
pub fn CategoriesPage(context: QueryContext) -> Element {
    entity_page::<Category>(context)
}
