use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Transaction};
use tracing::info;

use crate::domain::entities::catalog::slugify;
use crate::infra::sqlite::schema::open_connection;

const SHOPS: [(&str, i64); 3] = [
    ("Northwind Outfitters", 1),
    ("Harbor Home Goods", 1),
    ("Summit Electronics", 2),
];

const CATEGORIES: [&str; 4] = ["Apparel", "Footwear", "Accessories", "Outdoor"];
const BRANDS: [&str; 3] = ["Trailhead", "Cobalt", "Juniper"];
const TAGS: [&str; 3] = ["New arrival", "Best seller", "Clearance"];

const PRODUCT_NAMES: [&str; 25] = [
    "Merino Base Layer",
    "Rain Shell Jacket",
    "Trail Running Shoe",
    "Wool Hiking Sock",
    "Canvas Tote",
    "Insulated Bottle",
    "Fleece Pullover",
    "Packable Down Vest",
    "Leather Belt",
    "Sun Hat",
    "Camp Chair",
    "Trekking Poles",
    "Approach Shoe",
    "Daypack 22L",
    "Cotton Tee",
    "Softshell Pants",
    "Headlamp",
    "Beanie",
    "Gaiter",
    "Waterproof Boot",
    "Sling Bag",
    "Travel Towel",
    "Hammock",
    "Polarized Sunglasses",
    "Camp Mug",
];

fn insert_named(tx: &Transaction<'_>, sql: &str, shop_id: i64, names: &[&str]) -> Result<Vec<i64>> {
    let mut stmt = tx.prepare(sql).context("failed to prepare seed insert")?;
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        stmt.execute(params![shop_id, name, slugify(name)])
            .with_context(|| format!("failed to seed `{name}`"))?;
        ids.push(tx.last_insert_rowid());
    }
    Ok(ids)
}

/// Fills an empty database with a small demo catalog. Returns `false` when
/// shops already exist.
pub fn seed_demo_catalog(db_path: &Path) -> Result<bool> {
    let mut conn = open_connection(db_path)?;
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM shop", [], |row| row.get(0))
        .context("failed to count shops")?;
    if existing > 0 {
        return Ok(false);
    }

    let tx = conn.transaction().context("failed to start seed transaction")?;
    let mut product_count = 0usize;

    for (shop_idx, (shop_name, owner_id)) in SHOPS.iter().enumerate() {
        tx.execute(
            "INSERT INTO shop(name, owner_id) VALUES (?1, ?2)",
            params![shop_name, owner_id],
        )
        .context("failed to seed shop")?;
        let shop_id = tx.last_insert_rowid();

        let categories = insert_named(
            &tx,
            "INSERT INTO category(shop_id, name, slug) VALUES (?1, ?2, ?3)",
            shop_id,
            &CATEGORIES,
        )?;
        let brands = insert_named(
            &tx,
            "INSERT INTO brand(shop_id, name, slug) VALUES (?1, ?2, ?3)",
            shop_id,
            &BRANDS,
        )?;
        insert_named(
            &tx,
            "INSERT INTO tag(shop_id, name, slug) VALUES (?1, ?2, ?3)",
            shop_id,
            &TAGS,
        )?;

        tx.execute(
            "INSERT INTO attribute(shop_id, name, attr_values) VALUES (?1, 'Size', 'S, M, L, XL')",
            [shop_id],
        )
        .context("failed to seed attribute")?;
        tx.execute(
            "INSERT INTO attribute(shop_id, name, attr_values) VALUES (?1, 'Color', 'Black, Navy, Olive')",
            [shop_id],
        )
        .context("failed to seed attribute")?;

        tx.execute(
            "INSERT INTO tax_rate(shop_id, name, country, rate) VALUES (?1, 'Standard', 'US', 8.25)",
            [shop_id],
        )
        .context("failed to seed tax rate")?;
        let tax_rate_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO tax_rate(shop_id, name, country, rate) VALUES (?1, 'Reduced', 'US', 2.5)",
            [shop_id],
        )
        .context("failed to seed tax rate")?;

        tx.execute(
            "INSERT INTO coupon(shop_id, code, discount_kind, amount, starts_at, expires_at, usage_limit, times_used)
             VALUES (?1, 'WELCOME10', 'percent', 10, '2024-01-01', NULL, NULL, 3),
                    (?1, 'SPRING5', 'fixed', 5, '2024-03-01', '2024-05-31', 100, 100)",
            [shop_id],
        )
        .context("failed to seed coupons")?;

        // The first shop carries the full list; the others get a slice.
        let names: &[&str] = if shop_idx == 0 {
            &PRODUCT_NAMES
        } else {
            &PRODUCT_NAMES[..4 + shop_idx]
        };
        let mut insert_product = tx
            .prepare(
                "INSERT INTO product(shop_id, sku, name, price, stock, category_id, brand_id,
                                     tax_rate_id, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .context("failed to prepare product seed")?;
        for (idx, name) in names.iter().enumerate() {
            let sku = format!("S{shop_id}-{:03}", idx + 1);
            let price = 9.5 + (idx as f64) * 4.25;
            let stock = ((idx * 7) % 40) as i64;
            insert_product
                .execute(params![
                    shop_id,
                    sku,
                    name,
                    price,
                    stock,
                    categories[idx % categories.len()],
                    brands[idx % brands.len()],
                    tax_rate_id,
                    idx % 6 != 5
                ])
                .with_context(|| format!("failed to seed product `{name}`"))?;
            product_count += 1;
        }
    }

    tx.commit().context("failed to commit seed transaction")?;
    info!(shops = SHOPS.len(), products = product_count, "seeded demo catalog");
    Ok(true)
}
