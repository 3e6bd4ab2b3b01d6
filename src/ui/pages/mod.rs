pub mod attributes;
pub mod brands;
pub mod categories;
pub mod coupons;
pub mod entity_page;
pub mod products;
pub mod shops;
pub mod tags;
pub mod taxes;

use crate::domain::entities::catalog::{CatalogEntity, Lookups};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::table::{CellValue, QueryContext};
use crate::ui::form::{FormError, FormField, FormValues, SelectOption};
use crate::ui::table::toolbar::{DropdownOption, FilterableColumn};
use crate::usecase::services::entity_page::DialogTarget;

pub use attributes::AttributesPage;
pub use brands::BrandsPage;
pub use categories::CategoriesPage;
pub use coupons::CouponsPage;
pub use products::ProductsPage;
pub use shops::ShopsPage;
pub use tags::TagsPage;
pub use taxes::TaxesPage;

/// Form field carrying the owning shop when the page is not scoped to one.
pub const SHOP_FIELD: &str = "shop_id";

/// Page-level description of one entity.
pub trait EntityAdmin: CatalogEntity {
    const TITLE: &'static str;
    const SEARCH_PLACEHOLDER: &'static str;

    fn columns() -> Vec<ColumnDef<Self>>;
    fn filterable_columns(lookups: &Lookups) -> Vec<FilterableColumn>;
    fn form_fields(lookups: &Lookups) -> Vec<FormField>;
    /// Initial dialog values; `None` for a new record.
    fn form_values(row: Option<&Self>) -> FormValues;
    fn input_from_form(values: &FormValues) -> Result<Self::Input, FormError>;
}

/// Fields for the open dialog. Creating outside a shop scope asks for the
/// shop first.
pub fn dialog_fields<E: EntityAdmin>(
    lookups: &Lookups,
    context: QueryContext,
    target: Option<DialogTarget>,
) -> Vec<FormField> {
    let mut fields = E::form_fields(lookups);
    if context.shop_id().is_none() && target == Some(DialogTarget::Create) {
        fields.insert(
            0,
            FormField::select(SHOP_FIELD, "Shop", SelectOption::from_lookup(&lookups.shops))
                .required(),
        );
    }
    fields
}

/// Shop a new record lands in: the scoped shop, or the one picked in the form.
pub fn create_shop_id(context: QueryContext, values: &FormValues) -> Result<i64, FormError> {
    if let Some(shop_id) = context.shop_id() {
        return Ok(shop_id);
    }
    values
        .optional_integer(SHOP_FIELD)?
        .ok_or_else(|| FormError::InvalidValue {
            field: SHOP_FIELD.to_string(),
            reason: "Shop is required".to_string(),
        })
}

fn status_cell<E: CatalogEntity>(row: &E) -> CellValue {
    CellValue::Boolean(row.is_active())
}

/// Filter options keyed by display name, matching the joined name columns.
fn name_options(options: &[(i64, String)]) -> Vec<DropdownOption> {
    let mut dropdown: Vec<DropdownOption> = Vec::with_capacity(options.len());
    for (_, name) in options {
        if dropdown.iter().any(|existing| existing.value.eq_ignore_ascii_case(name)) {
            continue;
        }
        dropdown.push(DropdownOption::new(name.clone(), name.clone()));
    }
    dropdown
}
