use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;
use rusqlite::{params, OptionalExtension, Transaction};

use crate::domain::entities::catalog::slugify;
use crate::infra::sqlite::schema::{init_db, open_connection};

pub const PRODUCT_CSV_HEADERS: [&str; 7] =
    ["sku", "name", "price", "stock", "category", "brand", "active"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub categories_created: usize,
    pub brands_created: usize,
}

impl ImportSummary {
    pub fn rows(&self) -> usize {
        self.inserted + self.updated
    }
}

struct HeaderMap {
    positions: HashMap<&'static str, usize>,
}

impl HeaderMap {
    fn from_record(headers: &StringRecord) -> Result<Self> {
        let mut positions = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let header = header.trim().to_ascii_lowercase();
            if let Some(known) = PRODUCT_CSV_HEADERS.iter().find(|known| **known == header) {
                positions.insert(*known, idx);
            }
        }
        for required in ["sku", "name", "price"] {
            if !positions.contains_key(required) {
                anyhow::bail!("csv header `{required}` is required");
            }
        }
        Ok(Self { positions })
    }

    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.positions
            .get(name)
            .and_then(|idx| record.get(*idx))
            .map(str::trim)
            .unwrap_or("")
    }
}

fn parse_active(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "active" => Some(true),
        "0" | "false" | "no" | "inactive" => Some(false),
        _ => None,
    }
}

/// Finds a category or brand by name inside the shop, creating it when
/// missing. Returns the id and whether a row was inserted.
fn ensure_named(
    tx: &Transaction<'_>,
    table: &'static str,
    shop_id: i64,
    name: &str,
) -> Result<(i64, bool)> {
    let existing: Option<i64> = tx
        .query_row(
            &format!("SELECT id FROM {table} WHERE shop_id = ?1 AND name = ?2 COLLATE NOCASE"),
            params![shop_id, name],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to look up {table} `{name}`"))?;
    if let Some(id) = existing {
        return Ok((id, false));
    }
    tx.execute(
        &format!("INSERT INTO {table}(shop_id, name, slug) VALUES (?1, ?2, ?3)"),
        params![shop_id, name, slugify(name)],
    )
    .with_context(|| format!("failed to create {table} `{name}`"))?;
    Ok((tx.last_insert_rowid(), true))
}

/// Imports products into `shop_id`, matching existing rows by sku. The whole
/// file is one transaction: any bad row rolls everything back.
pub fn import_products_from_reader<R: Read>(
    db_path: &Path,
    shop_id: i64,
    source: R,
) -> Result<ImportSummary> {
    init_db(db_path)?;

    let mut reader = csv::Reader::from_reader(source);
    let headers = reader
        .headers()
        .context("failed to read csv headers")?
        .clone();
    let columns = HeaderMap::from_record(&headers)?;

    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;
    let mut summary = ImportSummary::default();
    let mut categories: HashMap<String, i64> = HashMap::new();
    let mut brands: HashMap<String, i64> = HashMap::new();

    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2;
        let record = record.with_context(|| format!("failed to parse csv line {line}"))?;

        let sku = columns.get(&record, "sku");
        let name = columns.get(&record, "name");
        if sku.is_empty() || name.is_empty() {
            anyhow::bail!("line {line}: sku and name are required");
        }
        let price: f64 = columns
            .get(&record, "price")
            .parse()
            .with_context(|| format!("line {line}: invalid price"))?;
        if !price.is_finite() {
            anyhow::bail!("line {line}: invalid price `{}`", columns.get(&record, "price"));
        }
        let stock_raw = columns.get(&record, "stock");
        let stock: i64 = if stock_raw.is_empty() {
            0
        } else {
            stock_raw
                .parse()
                .with_context(|| format!("line {line}: invalid stock"))?
        };
        if price < 0.0 || stock < 0 {
            anyhow::bail!("line {line}: price and stock must not be negative");
        }
        let active_raw = columns.get(&record, "active");
        let is_active = parse_active(active_raw)
            .with_context(|| format!("line {line}: invalid active flag `{active_raw}`"))?;

        let category_name = columns.get(&record, "category");
        let category_id = if category_name.is_empty() {
            None
        } else if let Some(id) = categories.get(&category_name.to_lowercase()) {
            Some(*id)
        } else {
            let (id, created) = ensure_named(&tx, "category", shop_id, category_name)?;
            if created {
                summary.categories_created += 1;
            }
            categories.insert(category_name.to_lowercase(), id);
            Some(id)
        };

        let brand_name = columns.get(&record, "brand");
        let brand_id = if brand_name.is_empty() {
            None
        } else if let Some(id) = brands.get(&brand_name.to_lowercase()) {
            Some(*id)
        } else {
            let (id, created) = ensure_named(&tx, "brand", shop_id, brand_name)?;
            if created {
                summary.brands_created += 1;
            }
            brands.insert(brand_name.to_lowercase(), id);
            Some(id)
        };

        let changed = tx
            .execute(
                "UPDATE product
                 SET name = ?1, price = ?2, stock = ?3, category_id = ?4, brand_id = ?5,
                     is_active = ?6
                 WHERE shop_id = ?7 AND sku = ?8",
                params![name, price, stock, category_id, brand_id, is_active, shop_id, sku],
            )
            .with_context(|| format!("line {line}: failed to update product `{sku}`"))?;
        if changed > 0 {
            summary.updated += 1;
            continue;
        }

        tx.execute(
            "INSERT INTO product(shop_id, sku, name, price, stock, category_id, brand_id, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![shop_id, sku, name, price, stock, category_id, brand_id, is_active],
        )
        .with_context(|| format!("line {line}: failed to insert product `{sku}`"))?;
        summary.inserted += 1;
    }

    tx.commit().context("failed to commit import transaction")?;
    Ok(summary)
}

pub fn import_products_csv(db_path: &Path, shop_id: i64, csv_path: &Path) -> Result<ImportSummary> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    import_products_from_reader(db_path, shop_id, file)
}
