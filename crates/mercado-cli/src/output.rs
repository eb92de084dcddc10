use std::path::Path;

use anyhow::{Context, Result, bail};
use mercado_core::ExportTable;
use serde_json::{Map, Value};

/// File formats the CLI can write, picked from the output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            _ => bail!(
                "Unsupported output file '{}': use a .xlsx or .csv extension",
                path.display()
            ),
        }
    }
}

/// Write the table to `path` in the format implied by its extension.
pub fn write_table(table: &ExportTable, path: &Path) -> Result<()> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Xlsx => {
            let bytes = table.to_xlsx().map_err(|e| anyhow::anyhow!(e))?;
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        OutputFormat::Csv => write_csv(table, path)?,
    }
    Ok(())
}

fn write_csv(table: &ExportTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    if !table.headers.is_empty() {
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Decode a record set: either a bare JSON array or `{"datos": [...]}`.
pub fn parse_records(json: &str) -> Result<Vec<Map<String, Value>>> {
    let value: Value = serde_json::from_str(json).context("Invalid JSON in input file")?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("datos") {
            Some(Value::Array(items)) => items,
            _ => bail!("Expected a JSON array or an object with a \"datos\" array"),
        },
        _ => bail!("Expected a JSON array or an object with a \"datos\" array"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => bail!("Record {i} is not a JSON object: {other}"),
        })
        .collect()
}
