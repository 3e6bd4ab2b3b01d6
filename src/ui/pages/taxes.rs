use dioxus::prelude::*;

use crate::domain::entities::catalog::{Lookups, TaxRate, TaxRateInput};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::values::flag_value;
use crate::ui::form::{FormError, FormField, FormValues, Validator};
use crate::ui::pages::entity_page::entity_page;
use crate::ui::pages::{status_cell, EntityAdmin};
use crate::ui::table::toolbar::FilterableColumn;

impl EntityAdmin for TaxRate {
    const TITLE: &'static str = "Tax rates";
    const SEARCH_PLACEHOLDER: &'static str = "Search name or country…";

    fn columns() -> Vec<ColumnDef<Self>> {
        vec![
            ColumnDef::new("name", "Name", |t: &TaxRate| CellValue::text(t.name.clone())).always_visible(),
            ColumnDef::new("country", "Country", |t: &TaxRate| CellValue::text(t.country.clone())),
            ColumnDef::new("rate", "Rate (%)", |t: &TaxRate| CellValue::Number(t.rate)),
            ColumnDef::new("status", "Active", status_cell::<TaxRate>),
            ColumnDef::new("created_at", "Created", |t: &TaxRate| CellValue::DateTime(t.created_at)),
        ]
    }

    fn filterable_columns(_lookups: &Lookups) -> Vec<FilterableColumn> {
        vec![
            FilterableColumn::text("country", "Country"),
            FilterableColumn::number("rate", "Rate"),
            FilterableColumn::boolean("status", "Statuses"),
        ]
    }

    fn form_fields(_lookups: &Lookups) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name")
                .required()
                .validate(Validator::MaxLength(60)),
            FormField::text("country", "Country")
                .required()
                .placeholder("US")
                .validate(Validator::MaxLength(2)),
            FormField::number("rate", "Rate (%)")
                .required()
                .validate(Validator::Percent),
            FormField::checkbox("is_active", "Active"),
        ]
    }

    fn form_values(row: Option<&Self>) -> FormValues {
        let Some(tax) = row else {
            return FormValues::new().with("is_active", "true");
        };
        FormValues::new()
            .with("name", tax.name.clone())
            .with("country", tax.country.clone())
            .with("rate", tax.rate.to_string())
            .with("is_active", flag_value(tax.is_active))
    }

    fn input_from_form(values: &FormValues) -> Result<TaxRateInput, FormError> {
        let country = values.text("country").to_ascii_uppercase();
        values.ensure(
            "country",
            country.len() == 2 && country.chars().all(|ch| ch.is_ascii_alphabetic()),
            "Country must be a two-letter code",
        )?;
        let rate = values.number("rate")?;
        values.ensure("rate", (0.0..=100.0).contains(&rate), "Rate must be between 0 and 100")?;
        Ok(TaxRateInput {
            name: values.text("name"),
            country,
            rate,
            is_active: values.flag("is_active"),
        })
    }
}

#[component]
pub fn TaxesPage(context: QueryContext) -> Element {
    entity_page::<TaxRate>(context)
}
