use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, types::Value, Connection, OptionalExtension};

use crate::domain::entities::catalog::{Lookups, Shop};
use crate::domain::entities::table::{
    format_number, FetchParams, FetchResult, FilterValue, QueryContext,
};
use crate::infra::sqlite::entities::{SqlColumn, SqlColumnKind, SqlEntity};
use crate::infra::sqlite::schema::open_connection;

/// Rejected query parameters: unknown column ids, bad page sizes, filter
/// values that do not fit the column type.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidQuery(pub String);

#[derive(Debug, thiserror::Error)]
#[error("{table} #{id} does not exist")]
pub struct RowMissing {
    pub table: &'static str,
    pub id: i64,
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    InvalidQuery(message.into()).into()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "active" | "true" | "yes" | "1" => Some(true),
        "inactive" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Restricts `t.shop_id` for shop and tenant contexts.
pub fn scope_clause(context: QueryContext) -> Option<(String, Value)> {
    match context {
        QueryContext::Admin => None,
        QueryContext::Shop { shop_id } => {
            Some(("t.shop_id = ?".to_string(), Value::Integer(shop_id)))
        }
        QueryContext::Tenant { owner_id } => Some((
            "t.shop_id IN (SELECT s.id FROM shop s WHERE s.owner_id = ?)".to_string(),
            Value::Integer(owner_id),
        )),
    }
}

fn filter_clause(column: &SqlColumn, value: &FilterValue) -> Result<(String, Value)> {
    let expr = column.expr;
    let clause = match (column.kind, value) {
        (SqlColumnKind::Text, FilterValue::Text(term)) => (
            format!("{expr} LIKE ? ESCAPE '\\'"),
            Value::Text(escape_like(term.trim())),
        ),
        (SqlColumnKind::Text, FilterValue::Select(term)) => (
            format!("{expr} = ? COLLATE NOCASE"),
            Value::Text(term.trim().to_string()),
        ),
        (SqlColumnKind::Text, FilterValue::Number(number)) => {
            (format!("{expr} = ?"), Value::Text(format_number(*number)))
        }
        (SqlColumnKind::Text | SqlColumnKind::Date, FilterValue::Date(date)) => (
            format!("date({expr}) = ?"),
            Value::Text(date.format("%Y-%m-%d").to_string()),
        ),
        (SqlColumnKind::Number, FilterValue::Number(number)) => {
            (format!("{expr} = ?"), Value::Real(*number))
        }
        (SqlColumnKind::Number, FilterValue::Text(raw) | FilterValue::Select(raw)) => {
            let number = raw.trim().parse::<f64>().map_err(|_| {
                invalid(format!("filter `{}` expects a number, got `{raw}`", column.id))
            })?;
            (format!("{expr} = ?"), Value::Real(number))
        }
        (SqlColumnKind::Boolean, FilterValue::Boolean(flag)) => {
            (format!("{expr} = ?"), Value::Integer(i64::from(*flag)))
        }
        (SqlColumnKind::Boolean, FilterValue::Text(raw) | FilterValue::Select(raw)) => {
            let flag = parse_flag(raw).ok_or_else(|| {
                invalid(format!("filter `{}` expects active/inactive, got `{raw}`", column.id))
            })?;
            (format!("{expr} = ?"), Value::Integer(i64::from(flag)))
        }
        (SqlColumnKind::Date, FilterValue::Text(raw) | FilterValue::Select(raw)) => (
            format!("{expr} LIKE ? ESCAPE '\\'"),
            Value::Text(escape_like(raw.trim())),
        ),
        (kind, value) => {
            return Err(invalid(format!(
                "filter `{}` of kind {kind:?} cannot take {value:?}",
                column.id
            )))
        }
    };
    Ok(clause)
}

fn lookup_column<E: SqlEntity>(id: &str) -> Result<&'static SqlColumn> {
    E::column(id).ok_or_else(|| invalid(format!("unknown column `{id}` for {}", E::TABLE)))
}

/// WHERE clause and its bound values for a page query.
pub fn where_clause<E: SqlEntity>(params: &FetchParams) -> Result<(String, Vec<Value>)> {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some((clause, value)) = scope_clause(params.context) {
        clauses.push(clause);
        values.push(value);
    }

    let global = params.global_filter.trim();
    if !global.is_empty() && !E::SEARCH.is_empty() {
        let pattern = escape_like(global);
        let ors = E::SEARCH
            .iter()
            .map(|expr| format!("{expr} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({ors})"));
        values.extend(E::SEARCH.iter().map(|_| Value::Text(pattern.clone())));
    }

    for filter in &params.column_filters {
        if filter.value.is_blank() {
            continue;
        }
        let column = lookup_column::<E>(&filter.id)?;
        let (clause, value) = filter_clause(column, &filter.value)?;
        clauses.push(clause);
        values.push(value);
    }

    if clauses.is_empty() {
        return Ok(("1 = 1".to_string(), values));
    }
    Ok((clauses.join(" AND "), values))
}

/// ORDER BY list, always ending in the id tiebreak so pages never overlap.
pub fn order_clause<E: SqlEntity>(params: &FetchParams) -> Result<String> {
    let mut terms = Vec::with_capacity(params.sorting.len() + 1);
    for sort in &params.sorting {
        let column = lookup_column::<E>(&sort.id)?;
        let direction = if sort.desc { "DESC" } else { "ASC" };
        match column.kind {
            SqlColumnKind::Text => terms.push(format!("{} COLLATE NOCASE {direction}", column.expr)),
            _ => terms.push(format!("{} {direction}", column.expr)),
        }
    }
    terms.push("t.id ASC".to_string());
    Ok(terms.join(", "))
}

pub fn query_entity_page<E: SqlEntity>(
    db_path: &Path,
    params: &FetchParams,
) -> Result<FetchResult<E>> {
    if params.page_size == 0 {
        return Err(invalid("page_size must be greater than zero"));
    }

    let (where_sql, where_values) = where_clause::<E>(params)?;
    let order_sql = order_clause::<E>(params)?;
    let conn = open_connection(db_path)?;

    let count_sql = format!("SELECT COUNT(*) FROM {} WHERE {where_sql}", E::FROM);
    let total: i64 = conn
        .query_row(
            &count_sql,
            rusqlite::params_from_iter(where_values.iter().cloned()),
            |row| row.get(0),
        )
        .with_context(|| format!("failed to count {} rows", E::TABLE))?;

    let row_sql = format!(
        "SELECT {} FROM {} WHERE {where_sql} ORDER BY {order_sql} LIMIT ? OFFSET ?",
        E::SELECT,
        E::FROM
    );
    let mut row_values = where_values;
    row_values.push(Value::Integer(params.page_size as i64));
    row_values.push(Value::Integer(params.offset() as i64));

    let mut stmt = conn
        .prepare(&row_sql)
        .with_context(|| format!("failed to prepare {} page query", E::TABLE))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(row_values), |row| E::from_row(row))
        .with_context(|| format!("failed to query {} page", E::TABLE))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read {} rows", E::TABLE))?;

    Ok(FetchResult::from_total(
        rows,
        total.max(0) as u64,
        params.page_size,
    ))
}

pub fn find_entity<E: SqlEntity>(conn: &Connection, id: i64) -> Result<Option<E>> {
    let sql = format!("SELECT {} FROM {} WHERE t.id = ?1", E::SELECT, E::FROM);
    conn.query_row(&sql, [id], |row| E::from_row(row))
        .optional()
        .with_context(|| format!("failed to load {} #{id}", E::TABLE))
}

fn require_entity<E: SqlEntity>(conn: &Connection, id: i64) -> Result<E> {
    find_entity::<E>(conn, id)?.ok_or_else(|| {
        RowMissing {
            table: E::TABLE,
            id,
        }
        .into()
    })
}

pub fn get_entity<E: SqlEntity>(db_path: &Path, id: i64) -> Result<E> {
    let conn = open_connection(db_path)?;
    require_entity(&conn, id)
}

pub fn insert_entity<E: SqlEntity>(db_path: &Path, shop_id: i64, input: &E::Input) -> Result<E> {
    let conn = open_connection(db_path)?;
    E::insert(&conn, shop_id, input).with_context(|| format!("failed to insert {}", E::TABLE))?;
    let id = conn.last_insert_rowid();
    require_entity(&conn, id)
}

pub fn update_entity<E: SqlEntity>(db_path: &Path, id: i64, input: &E::Input) -> Result<E> {
    let conn = open_connection(db_path)?;
    let changed =
        E::update(&conn, id, input).with_context(|| format!("failed to update {} #{id}", E::TABLE))?;
    if changed == 0 {
        return Err(RowMissing { table: E::TABLE, id }.into());
    }
    require_entity(&conn, id)
}

pub fn delete_entity<E: SqlEntity>(db_path: &Path, id: i64) -> Result<()> {
    let conn = open_connection(db_path)?;
    let changed = conn
        .execute(&format!("DELETE FROM {} WHERE id = ?1", E::TABLE), [id])
        .with_context(|| format!("failed to delete {} #{id}", E::TABLE))?;
    if changed == 0 {
        return Err(RowMissing { table: E::TABLE, id }.into());
    }
    Ok(())
}

pub fn set_entity_active<E: SqlEntity>(db_path: &Path, id: i64, active: bool) -> Result<E> {
    let conn = open_connection(db_path)?;
    let changed = conn
        .execute(
            &format!("UPDATE {} SET is_active = ?1 WHERE id = ?2", E::TABLE),
            params![active, id],
        )
        .with_context(|| format!("failed to toggle {} #{id}", E::TABLE))?;
    if changed == 0 {
        return Err(RowMissing { table: E::TABLE, id }.into());
    }
    require_entity(&conn, id)
}

fn load_options(conn: &Connection, sql: &str, values: &[Value]) -> Result<Vec<(i64, String)>> {
    let mut stmt = conn
        .prepare(sql)
        .context("failed to prepare lookup query")?;
    let options = stmt
        .query_map(rusqlite::params_from_iter(values.iter().cloned()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to query lookup options")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect lookup options")?;
    Ok(options)
}

pub fn load_lookups(db_path: &Path, context: QueryContext) -> Result<Lookups> {
    let conn = open_connection(db_path)?;
    let (scope_sql, scope_values) = match scope_clause(context) {
        Some((clause, value)) => (format!("WHERE {clause}"), vec![value]),
        None => (String::new(), Vec::new()),
    };

    let shops_sql = match context {
        QueryContext::Admin => "SELECT id, name FROM shop ORDER BY name COLLATE NOCASE".to_string(),
        QueryContext::Shop { .. } => {
            "SELECT id, name FROM shop WHERE id = ? ORDER BY name COLLATE NOCASE".to_string()
        }
        QueryContext::Tenant { .. } => {
            "SELECT id, name FROM shop WHERE owner_id = ? ORDER BY name COLLATE NOCASE".to_string()
        }
    };

    Ok(Lookups {
        shops: load_options(&conn, &shops_sql, &scope_values)?,
        categories: load_options(
            &conn,
            &format!("SELECT t.id, t.name FROM category t {scope_sql} ORDER BY t.name COLLATE NOCASE"),
            &scope_values,
        )?,
        brands: load_options(
            &conn,
            &format!("SELECT t.id, t.name FROM brand t {scope_sql} ORDER BY t.name COLLATE NOCASE"),
            &scope_values,
        )?,
        tax_rates: load_options(
            &conn,
            &format!(
                "SELECT t.id, t.name || ' (' || t.rate || '%)' FROM tax_rate t {scope_sql}
                 ORDER BY t.name COLLATE NOCASE"
            ),
            &scope_values,
        )?,
    })
}

/// Shops visible in `context`, with their product counts.
pub fn load_shops(db_path: &Path, context: QueryContext) -> Result<Vec<Shop>> {
    let conn = open_connection(db_path)?;
    let (scope_sql, values) = match context {
        QueryContext::Admin => (String::new(), Vec::new()),
        QueryContext::Shop { shop_id } => {
            ("WHERE s.id = ?".to_string(), vec![Value::Integer(shop_id)])
        }
        QueryContext::Tenant { owner_id } => (
            "WHERE s.owner_id = ?".to_string(),
            vec![Value::Integer(owner_id)],
        ),
    };
    let sql = format!(
        "SELECT s.id, s.name, s.owner_id, s.is_active,
                (SELECT COUNT(*) FROM product p WHERE p.shop_id = s.id)
         FROM shop s {scope_sql}
         ORDER BY s.name COLLATE NOCASE, s.id"
    );
    let mut stmt = conn.prepare(&sql).context("failed to prepare shop query")?;
    let shops = stmt
        .query_map(rusqlite::params_from_iter(values), |row| {
            Ok(Shop {
                id: row.get(0)?,
                name: row.get(1)?,
                owner_id: row.get(2)?,
                is_active: row.get::<_, i64>(3)? != 0,
                product_count: row.get(4)?,
            })
        })
        .context("failed to query shops")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect shops")?;
    Ok(shops)
}

pub fn upsert_column_visibility(
    db_path: &Path,
    table_key: &str,
    visibility: &BTreeMap<String, bool>,
) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start column visibility transaction")?;

    tx.execute(
        "DELETE FROM column_visibility WHERE table_key = ?1",
        [table_key],
    )
    .context("failed to clear existing column visibility")?;

    let mut insert_stmt = tx
        .prepare(
            "INSERT INTO column_visibility(table_key, column_id, visible)
             VALUES (?1, ?2, ?3)",
        )
        .context("failed to prepare column visibility insert")?;

    for (column_id, visible) in visibility {
        insert_stmt
            .execute(params![table_key, column_id, *visible])
            .context("failed to insert column visibility")?;
    }

    drop(insert_stmt);
    tx.commit()
        .context("failed to commit column visibility updates")?;
    Ok(())
}

pub fn load_column_visibility(db_path: &Path, table_key: &str) -> Result<BTreeMap<String, bool>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT column_id, visible
             FROM column_visibility
             WHERE table_key = ?1
             ORDER BY column_id ASC",
        )
        .context("failed to prepare column visibility query")?;

    let visibility_iter = stmt
        .query_map([table_key], |row| {
            let column_id: String = row.get(0)?;
            let visible: bool = row.get(1)?;
            Ok((column_id, visible))
        })
        .context("failed to query column visibility")?;

    let mut visibility = BTreeMap::new();
    for item in visibility_iter {
        let (column_id, visible) = item.context("failed to read column visibility row")?;
        visibility.insert(column_id, visible);
    }

    Ok(visibility)
}
