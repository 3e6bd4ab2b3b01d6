use dioxus::prelude::*;

use crate::domain::entities::catalog::{Coupon, CouponInput, DiscountKind, Lookups};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::values::{flag_value, optional_date_value};
use crate::ui::form::{FormError, FormField, FormValues, SelectOption, Validator};
use crate::ui::pages::entity_page::entity_page;
use crate::ui::pages::{status_cell, EntityAdmin};
use crate::ui::table::toolbar::{DropdownOption, FilterableColumn};

fn optional_date_cell(date: Option<chrono::NaiveDate>) -> CellValue {
    date.map(CellValue::Date).unwrap_or(CellValue::Empty)
}

fn usage_cell(coupon: &Coupon) -> CellValue {
    match coupon.usage_limit {
        Some(limit) => CellValue::text(format!("{} / {limit}", coupon.times_used)),
        None => CellValue::Integer(coupon.times_used),
    }
}

impl EntityAdmin for Coupon {
    const TITLE: &'static str = "Coupons";
    const SEARCH_PLACEHOLDER: &'static str = "Search coupon codes…";

    fn columns() -> Vec<ColumnDef<Self>> {
        vec![
            ColumnDef::new("code", "Code", |c: &Coupon| CellValue::text(c.code.clone())).always_visible(),
            ColumnDef::new("discount_kind", "Type", |c: &Coupon| {
                CellValue::text(c.discount_kind.as_str())
            }),
            ColumnDef::new("amount", "Amount", |c: &Coupon| CellValue::Number(c.amount)),
            ColumnDef::new("starts_at", "Starts", |c: &Coupon| optional_date_cell(c.starts_at)),
            ColumnDef::new("expires_at", "Expires", |c: &Coupon| optional_date_cell(c.expires_at)),
            ColumnDef::new("usage", "Used", usage_cell),
            ColumnDef::new("status", "Active", status_cell::<Coupon>),
            ColumnDef::new("created_at", "Created", |c: &Coupon| CellValue::DateTime(c.created_at)),
        ]
    }

    fn filterable_columns(_lookups: &Lookups) -> Vec<FilterableColumn> {
        vec![
            FilterableColumn::select(
                "discount_kind",
                "Types",
                vec![
                    DropdownOption::new(DiscountKind::Percent.as_str(), "Percent"),
                    DropdownOption::new(DiscountKind::Fixed.as_str(), "Fixed"),
                ],
            ),
            FilterableColumn::date("expires_at", "Expires"),
            FilterableColumn::boolean("status", "Statuses"),
        ]
    }

    fn form_fields(_lookups: &Lookups) -> Vec<FormField> {
        vec![
            FormField::text("code", "Code")
                .required()
                .placeholder("SPRING10")
                .validate(Validator::Code)
                .validate(Validator::MaxLength(24)),
            FormField::select(
                "discount_kind",
                "Type",
                vec![
                    SelectOption::new(DiscountKind::Percent.as_str(), "Percent"),
                    SelectOption::new(DiscountKind::Fixed.as_str(), "Fixed amount"),
                ],
            )
            .required(),
            FormField::number("amount", "Amount")
                .required()
                .validate(Validator::NonNegative),
            FormField::date("starts_at", "Starts"),
            FormField::date("expires_at", "Expires"),
            FormField::number("usage_limit", "Usage limit")
                .validate(Validator::Integer)
                .validate(Validator::NonNegative)
                .placeholder("unlimited"),
            FormField::checkbox("is_active", "Active"),
        ]
    }

    fn form_values(row: Option<&Self>) -> FormValues {
        let Some(coupon) = row else {
            return FormValues::new()
                .with("discount_kind", DiscountKind::Percent.as_str())
                .with("is_active", "true");
        };
        FormValues::new()
            .with("code", coupon.code.clone())
            .with("discount_kind", coupon.discount_kind.as_str())
            .with("amount", coupon.amount.to_string())
            .with("starts_at", optional_date_value(coupon.starts_at))
            .with("expires_at", optional_date_value(coupon.expires_at))
            .with(
                "usage_limit",
                coupon.usage_limit.map(|limit| limit.to_string()).unwrap_or_default(),
            )
            .with("is_active", flag_value(coupon.is_active))
    }

    fn input_from_form(values: &FormValues) -> Result<CouponInput, FormError> {
        let discount_kind = DiscountKind::parse(&values.text("discount_kind")).ok_or_else(|| {
            FormError::InvalidValue {
                field: "discount_kind".to_string(),
                reason: "Choose percent or fixed".to_string(),
            }
        })?;
        let amount = values.number("amount")?;
        values.ensure("amount", amount >= 0.0, "Amount must not be negative")?;
        if discount_kind == DiscountKind::Percent {
            values.ensure("amount", amount <= 100.0, "A percent discount cannot exceed 100")?;
        }
        let starts_at = values.optional_date("starts_at")?;
        let expires_at = values.optional_date("expires_at")?;
        if let (Some(starts), Some(expires)) = (starts_at, expires_at) {
            values.ensure("expires_at", expires >= starts, "Expiry must not precede the start date")?;
        }
        let usage_limit = values.optional_integer("usage_limit")?;
        values.ensure(
            "usage_limit",
            !matches!(usage_limit, Some(limit) if limit < 0),
            "Usage limit must not be negative",
        )?;
        Ok(CouponInput {
            code: values.text("code").to_ascii_uppercase(),
            discount_kind,
            amount,
            starts_at,
            expires_at,
            usage_limit,
            is_active: values.flag("is_active"),
        })
    }
}

#[component]
pub fn CouponsPage(context: QueryContext) -> Element {
    entity_page::<Coupon>(context)
}
