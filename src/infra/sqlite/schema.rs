use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS shop (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            owner_id    INTEGER NOT NULL,
            is_active   INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS category (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            slug        TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (shop_id, slug),
            FOREIGN KEY (shop_id) REFERENCES shop(id)
        );

        CREATE TABLE IF NOT EXISTS brand (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            slug        TEXT NOT NULL,
            website     TEXT,
            logo        TEXT,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (shop_id, slug),
            FOREIGN KEY (shop_id) REFERENCES shop(id)
        );

        CREATE TABLE IF NOT EXISTS attribute (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            attr_values TEXT NOT NULL DEFAULT '',
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (shop_id, name),
            FOREIGN KEY (shop_id) REFERENCES shop(id)
        );

        CREATE TABLE IF NOT EXISTS tag (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            slug        TEXT NOT NULL,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (shop_id, slug),
            FOREIGN KEY (shop_id) REFERENCES shop(id)
        );

        CREATE TABLE IF NOT EXISTS tax_rate (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            country     TEXT NOT NULL,
            rate        REAL NOT NULL,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (shop_id, name),
            FOREIGN KEY (shop_id) REFERENCES shop(id)
        );

        CREATE TABLE IF NOT EXISTS coupon (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id       INTEGER NOT NULL,
            code          TEXT NOT NULL,
            discount_kind TEXT NOT NULL,
            amount        REAL NOT NULL,
            starts_at     TEXT,
            expires_at    TEXT,
            usage_limit   INTEGER,
            times_used    INTEGER NOT NULL DEFAULT 0,
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (shop_id, code),
            FOREIGN KEY (shop_id) REFERENCES shop(id)
        );

        CREATE TABLE IF NOT EXISTS product (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id     INTEGER NOT NULL,
            sku         TEXT NOT NULL,
            name        TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price       REAL NOT NULL,
            stock       INTEGER NOT NULL DEFAULT 0,
            category_id INTEGER,
            brand_id    INTEGER,
            tax_rate_id INTEGER,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (shop_id, sku),
            FOREIGN KEY (shop_id) REFERENCES shop(id),
            FOREIGN KEY (category_id) REFERENCES category(id) ON DELETE SET NULL,
            FOREIGN KEY (brand_id) REFERENCES brand(id) ON DELETE SET NULL,
            FOREIGN KEY (tax_rate_id) REFERENCES tax_rate(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS column_visibility (
            table_key   TEXT NOT NULL,
            column_id   TEXT NOT NULL,
            visible     INTEGER NOT NULL,
            PRIMARY KEY (table_key, column_id)
        );

        CREATE INDEX IF NOT EXISTS idx_product_shop ON product(shop_id);
        CREATE INDEX IF NOT EXISTS idx_product_category ON product(category_id);
        CREATE INDEX IF NOT EXISTS idx_product_brand ON product(brand_id);
        CREATE INDEX IF NOT EXISTS idx_coupon_shop ON coupon(shop_id);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
