use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::entities::table::TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Category,
    Brand,
    Attribute,
    Tag,
    TaxRate,
    Coupon,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Product,
        EntityKind::Category,
        EntityKind::Brand,
        EntityKind::Attribute,
        EntityKind::Tag,
        EntityKind::TaxRate,
        EntityKind::Coupon,
    ];

    /// Key used for per-table settings such as column visibility.
    pub fn table_key(self) -> &'static str {
        match self {
            EntityKind::Product => "products",
            EntityKind::Category => "categories",
            EntityKind::Brand => "brands",
            EntityKind::Attribute => "attributes",
            EntityKind::Tag => "tags",
            EntityKind::TaxRate => "taxes",
            EntityKind::Coupon => "coupons",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Product => "Products",
            EntityKind::Category => "Categories",
            EntityKind::Brand => "Brands",
            EntityKind::Attribute => "Attributes",
            EntityKind::Tag => "Tags",
            EntityKind::TaxRate => "Tax rates",
            EntityKind::Coupon => "Coupons",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Category => "category",
            EntityKind::Brand => "brand",
            EntityKind::Attribute => "attribute",
            EntityKind::Tag => "tag",
            EntityKind::TaxRate => "tax rate",
            EntityKind::Coupon => "coupon",
        }
    }
}

/// Common surface of every back-office entity.
pub trait CatalogEntity: TableRow + Clone + PartialEq + Send + Sync + 'static {
    type Input: Clone + fmt::Debug + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> i64;
    fn display_name(&self) -> String;
    fn is_active(&self) -> bool;
}

macro_rules! keyed_by_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TableRow for $ty {
                fn row_key(&self) -> String {
                    self.id.to_string()
                }
            }
        )+
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub is_active: bool,
    pub product_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub shop_id: i64,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub brand_id: Option<i64>,
    pub brand_name: Option<String>,
    pub tax_rate_id: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub tax_rate_id: Option<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandInput {
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub values: Vec<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInput {
    pub name: String,
    pub values: Vec<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInput {
    pub name: String,
    pub slug: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxRate {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub country: String,
    pub rate: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxRateInput {
    pub name: String,
    pub country: String,
    pub rate: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountKind {
    Percent,
    Fixed,
}

impl DiscountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountKind::Percent => "percent",
            DiscountKind::Fixed => "fixed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percent" => Some(DiscountKind::Percent),
            "fixed" => Some(DiscountKind::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub id: i64,
    pub shop_id: i64,
    pub code: String,
    pub discount_kind: DiscountKind,
    pub amount: f64,
    pub starts_at: Option<NaiveDate>,
    pub expires_at: Option<NaiveDate>,
    pub usage_limit: Option<i64>,
    pub times_used: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Coupon {
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expires_at.is_some_and(|expires| expires < today)
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.times_used >= limit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CouponInput {
    pub code: String,
    pub discount_kind: DiscountKind,
    pub amount: f64,
    pub starts_at: Option<NaiveDate>,
    pub expires_at: Option<NaiveDate>,
    pub usage_limit: Option<i64>,
    pub is_active: bool,
}

keyed_by_id!(Shop, Product, Category, Brand, Attribute, Tag, TaxRate, Coupon);

impl CatalogEntity for Product {
    type Input = ProductInput;
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.sku)
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl CatalogEntity for Category {
    type Input = CategoryInput;
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl CatalogEntity for Brand {
    type Input = BrandInput;
    const KIND: EntityKind = EntityKind::Brand;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl CatalogEntity for Attribute {
    type Input = AttributeInput;
    const KIND: EntityKind = EntityKind::Attribute;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl CatalogEntity for Tag {
    type Input = TagInput;
    const KIND: EntityKind = EntityKind::Tag;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl CatalogEntity for TaxRate {
    type Input = TaxRateInput;
    const KIND: EntityKind = EntityKind::TaxRate;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} ({}%)", self.name, crate::domain::entities::table::format_number(self.rate))
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl CatalogEntity for Coupon {
    type Input = CouponInput;
    const KIND: EntityKind = EntityKind::Coupon;

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.code.clone()
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Option lists for select fields and filters that depend on other tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lookups {
    pub shops: Vec<(i64, String)>,
    pub categories: Vec<(i64, String)>,
    pub brands: Vec<(i64, String)>,
    pub tax_rates: Vec<(i64, String)>,
}

/// Lowercase, dash separated, ascii-only slug.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Splits a comma separated list, trimming blanks and duplicates.
pub fn split_values(raw: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() || values.iter().any(|existing| existing.eq_ignore_ascii_case(part)) {
            continue;
        }
        values.push(part.to_string());
    }
    values
}
