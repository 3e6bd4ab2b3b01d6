use rusqlite::{params, Connection, Row};

use crate::domain::entities::catalog::{
    slugify, split_values, Attribute, Brand, CatalogEntity, Category, Coupon, DiscountKind,
    Product, Tag, TaxRate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlColumnKind {
    Text,
    Number,
    Boolean,
    Date,
}

/// Whitelisted column id → SQL expression used for filters and sorting.
#[derive(Debug, Clone, Copy)]
pub struct SqlColumn {
    pub id: &'static str,
    pub expr: &'static str,
    pub kind: SqlColumnKind,
}

const fn col(id: &'static str, expr: &'static str, kind: SqlColumnKind) -> SqlColumn {
    SqlColumn { id, expr, kind }
}

/// Table mapping for an entity. The base table is always aliased `t`.
pub trait SqlEntity: CatalogEntity + Sized {
    const TABLE: &'static str;
    const SELECT: &'static str;
    const FROM: &'static str;
    const COLUMNS: &'static [SqlColumn];
    const SEARCH: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize>;
    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize>;

    fn column(id: &str) -> Option<&'static SqlColumn> {
        Self::COLUMNS.iter().find(|column| column.id == id)
    }
}

fn effective_slug(name: &str, slug: &str) -> String {
    if slug.trim().is_empty() {
        slugify(name)
    } else {
        slugify(slug)
    }
}

impl SqlEntity for Product {
    const TABLE: &'static str = "product";
    const SELECT: &'static str = "t.id, t.shop_id, t.sku, t.name, t.description, t.price, t.stock,
        t.category_id, c.name, t.brand_id, b.name, t.tax_rate_id, t.is_active, t.created_at";
    const FROM: &'static str = "product t
        LEFT JOIN category c ON c.id = t.category_id
        LEFT JOIN brand b ON b.id = t.brand_id";
    const COLUMNS: &'static [SqlColumn] = &[
        col("sku", "t.sku", SqlColumnKind::Text),
        col("name", "t.name", SqlColumnKind::Text),
        col("category", "c.name", SqlColumnKind::Text),
        col("brand", "b.name", SqlColumnKind::Text),
        col("price", "t.price", SqlColumnKind::Number),
        col("stock", "t.stock", SqlColumnKind::Number),
        col("status", "t.is_active", SqlColumnKind::Boolean),
        col("created_at", "t.created_at", SqlColumnKind::Date),
    ];
    const SEARCH: &'static [&'static str] = &["t.sku", "t.name", "t.description", "c.name", "b.name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            sku: row.get(2)?,
            name: row.get(3)?,
            description: row.get(4)?,
            price: row.get(5)?,
            stock: row.get(6)?,
            category_id: row.get(7)?,
            category_name: row.get(8)?,
            brand_id: row.get(9)?,
            brand_name: row.get(10)?,
            tax_rate_id: row.get(11)?,
            is_active: row.get(12)?,
            created_at: row.get(13)?,
        })
    }

    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO product(shop_id, sku, name, description, price, stock,
                                 category_id, brand_id, tax_rate_id, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                shop_id,
                input.sku.trim(),
                input.name.trim(),
                input.description,
                input.price,
                input.stock,
                input.category_id,
                input.brand_id,
                input.tax_rate_id,
                input.is_active
            ],
        )
    }

    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE product
             SET sku = ?1, name = ?2, description = ?3, price = ?4, stock = ?5,
                 category_id = ?6, brand_id = ?7, tax_rate_id = ?8, is_active = ?9
             WHERE id = ?10",
            params![
                input.sku.trim(),
                input.name.trim(),
                input.description,
                input.price,
                input.stock,
                input.category_id,
                input.brand_id,
                input.tax_rate_id,
                input.is_active,
                id
            ],
        )
    }
}

impl SqlEntity for Category {
    const TABLE: &'static str = "category";
    const SELECT: &'static str =
        "t.id, t.shop_id, t.name, t.slug, t.description, t.is_active, t.created_at";
    const FROM: &'static str = "category t";
    const COLUMNS: &'static [SqlColumn] = &[
        col("name", "t.name", SqlColumnKind::Text),
        col("slug", "t.slug", SqlColumnKind::Text),
        col("description", "t.description", SqlColumnKind::Text),
        col("status", "t.is_active", SqlColumnKind::Boolean),
        col("created_at", "t.created_at", SqlColumnKind::Date),
    ];
    const SEARCH: &'static [&'static str] = &["t.name", "t.slug", "t.description"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Category {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            name: row.get(2)?,
            slug: row.get(3)?,
            description: row.get(4)?,
            is_active: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO category(shop_id, name, slug, description, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                shop_id,
                input.name.trim(),
                effective_slug(&input.name, &input.slug),
                input.description,
                input.is_active
            ],
        )
    }

    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE category SET name = ?1, slug = ?2, description = ?3, is_active = ?4
             WHERE id = ?5",
            params![
                input.name.trim(),
                effective_slug(&input.name, &input.slug),
                input.description,
                input.is_active,
                id
            ],
        )
    }
}

impl SqlEntity for Brand {
    const TABLE: &'static str = "brand";
    const SELECT: &'static str =
        "t.id, t.shop_id, t.name, t.slug, t.website, t.logo, t.is_active, t.created_at";
    const FROM: &'static str = "brand t";
    const COLUMNS: &'static [SqlColumn] = &[
        col("name", "t.name", SqlColumnKind::Text),
        col("slug", "t.slug", SqlColumnKind::Text),
        col("website", "t.website", SqlColumnKind::Text),
        col("status", "t.is_active", SqlColumnKind::Boolean),
        col("created_at", "t.created_at", SqlColumnKind::Date),
    ];
    const SEARCH: &'static [&'static str] = &["t.name", "t.slug", "t.website"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Brand {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            name: row.get(2)?,
            slug: row.get(3)?,
            website: row.get(4)?,
            logo: row.get(5)?,
            is_active: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO brand(shop_id, name, slug, website, logo, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                shop_id,
                input.name.trim(),
                effective_slug(&input.name, &input.slug),
                input.website,
                input.logo,
                input.is_active
            ],
        )
    }

    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE brand SET name = ?1, slug = ?2, website = ?3, logo = ?4, is_active = ?5
             WHERE id = ?6",
            params![
                input.name.trim(),
                effective_slug(&input.name, &input.slug),
                input.website,
                input.logo,
                input.is_active,
                id
            ],
        )
    }
}

impl SqlEntity for Attribute {
    const TABLE: &'static str = "attribute";
    const SELECT: &'static str = "t.id, t.shop_id, t.name, t.attr_values, t.is_active, t.created_at";
    const FROM: &'static str = "attribute t";
    const COLUMNS: &'static [SqlColumn] = &[
        col("name", "t.name", SqlColumnKind::Text),
        col("values", "t.attr_values", SqlColumnKind::Text),
        col("status", "t.is_active", SqlColumnKind::Boolean),
        col("created_at", "t.created_at", SqlColumnKind::Date),
    ];
    const SEARCH: &'static [&'static str] = &["t.name", "t.attr_values"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let raw_values: String = row.get(3)?;
        Ok(Attribute {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            name: row.get(2)?,
            values: split_values(&raw_values),
            is_active: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO attribute(shop_id, name, attr_values, is_active) VALUES (?1, ?2, ?3, ?4)",
            params![
                shop_id,
                input.name.trim(),
                input.values.join(", "),
                input.is_active
            ],
        )
    }

    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE attribute SET name = ?1, attr_values = ?2, is_active = ?3 WHERE id = ?4",
            params![input.name.trim(), input.values.join(", "), input.is_active, id],
        )
    }
}

impl SqlEntity for Tag {
    const TABLE: &'static str = "tag";
    const SELECT: &'static str = "t.id, t.shop_id, t.name, t.slug, t.is_active, t.created_at";
    const FROM: &'static str = "tag t";
    const COLUMNS: &'static [SqlColumn] = &[
        col("name", "t.name", SqlColumnKind::Text),
        col("slug", "t.slug", SqlColumnKind::Text),
        col("status", "t.is_active", SqlColumnKind::Boolean),
        col("created_at", "t.created_at", SqlColumnKind::Date),
    ];
    const SEARCH: &'static [&'static str] = &["t.name", "t.slug"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tag {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            name: row.get(2)?,
            slug: row.get(3)?,
            is_active: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO tag(shop_id, name, slug, is_active) VALUES (?1, ?2, ?3, ?4)",
            params![
                shop_id,
                input.name.trim(),
                effective_slug(&input.name, &input.slug),
                input.is_active
            ],
        )
    }

    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE tag SET name = ?1, slug = ?2, is_active = ?3 WHERE id = ?4",
            params![
                input.name.trim(),
                effective_slug(&input.name, &input.slug),
                input.is_active,
                id
            ],
        )
    }
}

impl SqlEntity for TaxRate {
    const TABLE: &'static str = "tax_rate";
    const SELECT: &'static str =
        "t.id, t.shop_id, t.name, t.country, t.rate, t.is_active, t.created_at";
    const FROM: &'static str = "tax_rate t";
    const COLUMNS: &'static [SqlColumn] = &[
        col("name", "t.name", SqlColumnKind::Text),
        col("country", "t.country", SqlColumnKind::Text),
        col("rate", "t.rate", SqlColumnKind::Number),
        col("status", "t.is_active", SqlColumnKind::Boolean),
        col("created_at", "t.created_at", SqlColumnKind::Date),
    ];
    const SEARCH: &'static [&'static str] = &["t.name", "t.country"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TaxRate {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            name: row.get(2)?,
            country: row.get(3)?,
            rate: row.get(4)?,
            is_active: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO tax_rate(shop_id, name, country, rate, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                shop_id,
                input.name.trim(),
                input.country.trim().to_ascii_uppercase(),
                input.rate,
                input.is_active
            ],
        )
    }

    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE tax_rate SET name = ?1, country = ?2, rate = ?3, is_active = ?4 WHERE id = ?5",
            params![
                input.name.trim(),
                input.country.trim().to_ascii_uppercase(),
                input.rate,
                input.is_active,
                id
            ],
        )
    }
}

impl SqlEntity for Coupon {
    const TABLE: &'static str = "coupon";
    const SELECT: &'static str = "t.id, t.shop_id, t.code, t.discount_kind, t.amount, t.starts_at,
        t.expires_at, t.usage_limit, t.times_used, t.is_active, t.created_at";
    const FROM: &'static str = "coupon t";
    const COLUMNS: &'static [SqlColumn] = &[
        col("code", "t.code", SqlColumnKind::Text),
        col("discount_kind", "t.discount_kind", SqlColumnKind::Text),
        col("amount", "t.amount", SqlColumnKind::Number),
        col("starts_at", "t.starts_at", SqlColumnKind::Date),
        col("expires_at", "t.expires_at", SqlColumnKind::Date),
        col("usage", "t.times_used", SqlColumnKind::Number),
        col("status", "t.is_active", SqlColumnKind::Boolean),
        col("created_at", "t.created_at", SqlColumnKind::Date),
    ];
    const SEARCH: &'static [&'static str] = &["t.code", "t.discount_kind"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let kind: String = row.get(3)?;
        let discount_kind = DiscountKind::parse(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown discount kind `{kind}`").into(),
            )
        })?;
        Ok(Coupon {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            code: row.get(2)?,
            discount_kind,
            amount: row.get(4)?,
            starts_at: row.get(5)?,
            expires_at: row.get(6)?,
            usage_limit: row.get(7)?,
            times_used: row.get(8)?,
            is_active: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn insert(conn: &Connection, shop_id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO coupon(shop_id, code, discount_kind, amount, starts_at, expires_at,
                                usage_limit, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                shop_id,
                input.code.trim().to_ascii_uppercase(),
                input.discount_kind.as_str(),
                input.amount,
                input.starts_at,
                input.expires_at,
                input.usage_limit,
                input.is_active
            ],
        )
    }

    fn update(conn: &Connection, id: i64, input: &Self::Input) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE coupon
             SET code = ?1, discount_kind = ?2, amount = ?3, starts_at = ?4, expires_at = ?5,
                 usage_limit = ?6, is_active = ?7
             WHERE id = ?8",
            params![
                input.code.trim().to_ascii_uppercase(),
                input.discount_kind.as_str(),
                input.amount,
                input.starts_at,
                input.expires_at,
                input.usage_limit,
                input.is_active,
                id
            ],
        )
    }
}
