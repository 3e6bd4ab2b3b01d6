use dioxus::prelude::*;

use crate::domain::entities::catalog::{Lookups, Product, ProductInput};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::values::{flag_value, optional_id_value};
use crate::ui::form::{FormError, FormField, FormValues, SelectOption, Validator};
use crate::ui::pages::entity_page::entity_page;
use crate::ui::pages::{name_options, status_cell, EntityAdmin};
use crate::ui::table::toolbar::FilterableColumn;

impl EntityAdmin for Product {
    const TITLE: &'static str = "Products";
    const SEARCH_PLACEHOLDER: &'static str = "Search sku, name, category…";

    fn columns() -> Vec<ColumnDef<Self>> {
        vec![
            ColumnDef::new("sku", "SKU", |p: &Product| CellValue::text(p.sku.clone())).always_visible(),
            ColumnDef::new("name", "Name", |p: &Product| CellValue::text(p.name.clone())),
            ColumnDef::new("category", "Category", |p: &Product| {
                CellValue::optional_text(p.category_name.as_deref())
            }),
            ColumnDef::new("brand", "Brand", |p: &Product| {
                CellValue::optional_text(p.brand_name.as_deref())
            }),
            ColumnDef::new("price", "Price", |p: &Product| CellValue::Number(p.price)),
            ColumnDef::new("stock", "Stock", |p: &Product| CellValue::Integer(p.stock)),
            ColumnDef::new("status", "Active", status_cell::<Product>),
            ColumnDef::new("created_at", "Created", |p: &Product| {
                CellValue::DateTime(p.created_at)
            }),
        ]
    }

    fn filterable_columns(lookups: &Lookups) -> Vec<FilterableColumn> {
        vec![
            FilterableColumn::select("category", "Categories", name_options(&lookups.categories)),
            FilterableColumn::select("brand", "Brands", name_options(&lookups.brands)),
            FilterableColumn::boolean("status", "Statuses"),
        ]
    }

    fn form_fields(lookups: &Lookups) -> Vec<FormField> {
        vec![
            FormField::text("sku", "SKU")
                .required()
                .validate(Validator::MaxLength(32)),
            FormField::text("name", "Name")
                .required()
                .validate(Validator::MaxLength(120)),
            FormField::textarea("description", "Description"),
            FormField::number("price", "Price")
                .required()
                .validate(Validator::NonNegative),
            FormField::number("stock", "Stock")
                .validate(Validator::Integer)
                .validate(Validator::NonNegative)
                .placeholder("0"),
            FormField::select(
                "category_id",
                "Category",
                SelectOption::from_lookup(&lookups.categories),
            ),
            FormField::select("brand_id", "Brand", SelectOption::from_lookup(&lookups.brands)),
            FormField::select(
                "tax_rate_id",
                "Tax rate",
                SelectOption::from_lookup(&lookups.tax_rates),
            ),
            FormField::checkbox("is_active", "Active"),
        ]
    }

    fn form_values(row: Option<&Self>) -> FormValues {
        let Some(product) = row else {
            return FormValues::new().with("stock", "0").with("is_active", "true");
        };
        FormValues::new()
            .with("sku", product.sku.clone())
            .with("name", product.name.clone())
            .with("description", product.description.clone())
            .with("price", product.price.to_string())
            .with("stock", product.stock.to_string())
            .with("category_id", optional_id_value(product.category_id))
            .with("brand_id", optional_id_value(product.brand_id))
            .with("tax_rate_id", optional_id_value(product.tax_rate_id))
            .with("is_active", flag_value(product.is_active))
    }

    fn input_from_form(values: &FormValues) -> Result<ProductInput, FormError> {
        let price = values.number("price")?;
        values.ensure("price", price >= 0.0, "Price must not be negative")?;
        let stock = values.integer("stock")?;
        values.ensure("stock", stock >= 0, "Stock must not be negative")?;
        Ok(ProductInput {
            sku: values.text("sku"),
            name: values.text("name"),
            description: values.text("description"),
            price,
            stock,
            category_id: values.optional_integer("category_id")?,
            brand_id: values.optional_integer("brand_id")?,
            tax_rate_id: values.optional_integer("tax_rate_id")?,
            is_active: values.flag("is_active"),
        })
    }
}

#[component]
pub fn ProductsPage(context: QueryContext) -> Element {
    entity_page::<Product>(context)
}
