use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::domain::entities::column::ColumnDef;

/// Writes the header row and one record per row, in column order. Returns
/// the number of data records written.
pub fn write_view_csv<W: Write, T>(
    sink: W,
    columns: &[&ColumnDef<T>],
    rows: &[&T],
) -> Result<usize> {
    let mut writer = Writer::from_writer(sink);
    writer
        .write_record(columns.iter().map(|column| column.header))
        .context("failed to write csv header")?;
    for row in rows {
        writer
            .write_record(columns.iter().map(|column| column.value(row).display()))
            .context("failed to write csv record")?;
    }
    writer.flush().context("failed to flush csv output")?;
    Ok(rows.len())
}

pub fn export_view_csv<T>(path: &Path, columns: &[&ColumnDef<T>], rows: &[&T]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export dir: {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create export file: {}", path.display()))?;
    write_view_csv(file, columns, rows)
}
