use dioxus::prelude::*;

use crate::domain::entities::catalog::{Brand, BrandInput, Lookups};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::values::flag_value;
use crate::ui::form::{FormError, FormField, FormValues, Validator};
use crate::ui::pages::entity_page::entity_page;
use crate::ui::pages::{status_cell, EntityAdmin};
use crate::ui::table::toolbar::FilterableColumn;

const LOGO_EXTENSIONS: &str = "png, jpg, jpeg, svg, webp";

fn is_web_address(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")) && !value.contains(char::is_whitespace)
}

impl EntityAdmin for Brand {
    const TITLE: &'static str = "Brands";
    const SEARCH_PLACEHOLDER: &'static str = "Search brands…";

    fn columns() -> Vec<ColumnDef<Self>> {
        vec![
            ColumnDef::new("name", "Name", |b: &Brand| CellValue::text(b.name.clone())).always_visible(),
            ColumnDef::new("slug", "Slug", |b: &Brand| CellValue::text(b.slug.clone())),
            ColumnDef::new("website", "Website", |b: &Brand| {
                CellValue::optional_text(b.website.as_deref())
            }),
            ColumnDef::new("status", "Active", status_cell::<Brand>),
            ColumnDef::new("created_at", "Created", |b: &Brand| CellValue::DateTime(b.created_at)),
        ]
    }

    fn filterable_columns(_lookups: &Lookups) -> Vec<FilterableColumn> {
        vec![
            FilterableColumn::text("website", "Website"),
            FilterableColumn::boolean("status", "Statuses"),
        ]
    }

    fn form_fields(_lookups: &Lookups) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name")
                .required()
                .validate(Validator::MaxLength(80)),
            FormField::text("slug", "Slug")
                .placeholder("generated from the name")
                .validate(Validator::MaxLength(80)),
            FormField::text("website", "Website").placeholder("https://"),
            FormField::file("logo", "Logo", LOGO_EXTENSIONS),
            FormField::checkbox("is_active", "Active"),
        ]
    }

    fn form_values(row: Option<&Self>) -> FormValues {
        let Some(brand) = row else {
            return FormValues::new().with("is_active", "true");
        };
        FormValues::new()
            .with("name", brand.name.clone())
            .with("slug", brand.slug.clone())
            .with("website", brand.website.clone().unwrap_or_default())
            .with("logo", brand.logo.clone().unwrap_or_default())
            .with("is_active", flag_value(brand.is_active))
    }

    fn input_from_form(values: &FormValues) -> Result<BrandInput, FormError> {
        let website = values.optional_text("website");
        if let Some(website) = &website {
            values.ensure(
                "website",
                is_web_address(website),
                "Website must start with http:// or https://",
            )?;
        }
        Ok(BrandInput {
            name: values.text("name"),
            slug: values.text("slug"),
            website,
            logo: values.optional_text("logo"),
            is_active: values.flag("is_active"),
        })
    }
}

#[component]
pub fn BrandsPage(context: QueryContext) -> Element {
    entity_page::<Brand>(context)
}
