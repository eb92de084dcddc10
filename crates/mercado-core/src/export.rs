//! Spreadsheet export of arbitrary record sets.
//!
//! The header is the ordered union of field names across the input: the
//! first row's order comes first, fields first seen in later rows are
//! appended. Every record gets a data row, even one with no values: empty
//! cells are written as formatted blanks so the row stays in the sheet's
//! used range. An empty input produces a workbook with a single empty sheet;
//! no header is invented. The same holds for records that carry no fields
//! at all, since there is no column to place them in.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::ProductRecord;

pub const SHEET_NAME: &str = "Productos MercadoLibre";
pub const EXPORT_FILENAME: &str = "productos_mercadolibre.xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;
const WIDTH_PADDING: usize = 2;
const WIDTH_FACTOR: f64 = 1.2;

/// Tabular view of a record set: a header plus one row per record,
/// every cell already rendered as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// Build from loosely-typed mappings.
    pub fn from_rows(records: &[Map<String, Value>]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.get(h).map(render_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn from_records(records: &[ProductRecord]) -> Result<Self, AppError> {
        let rows = records
            .iter()
            .map(ProductRecord::to_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rows(&rows))
    }

    /// Sheet rows including the header; zero when there is no header.
    pub fn row_count(&self) -> usize {
        if self.headers.is_empty() {
            0
        } else {
            self.rows.len() + 1
        }
    }

    /// Display width per column: longest cell (header included), padded and scaled.
    pub fn column_widths(&self) -> Vec<f64> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                (longest + WIDTH_PADDING) as f64 * WIDTH_FACTOR
            })
            .collect()
    }

    /// Render the table as an `.xlsx` workbook.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, AppError> {
        if self.row_count() > MAX_ROWS {
            return Err(AppError::ExportFailure(format!(
                "{} rows exceed the worksheet limit of {MAX_ROWS}",
                self.row_count()
            )));
        }
        if self.headers.len() > MAX_COLUMNS {
            return Err(AppError::ExportFailure(format!(
                "{} columns exceed the worksheet limit of {MAX_COLUMNS}",
                self.headers.len()
            )));
        }

        self.write_workbook().map_err(|e| AppError::ExportFailure(e.to_string()))
    }

    fn write_workbook(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        let text = Format::new().set_num_format("@");

        // Bounds were checked by the caller, so the casts below cannot truncate.
        for (col, header) in self.headers.iter().enumerate() {
            sheet.write_string(0, col as u16, header)?;
        }
        for (i, row) in self.rows.iter().enumerate() {
            let sheet_row = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    // Unformatted blanks are dropped by the writer.
                    sheet.write_blank(sheet_row, col as u16, &text)?;
                } else {
                    sheet.write_string(sheet_row, col as u16, cell)?;
                }
            }
        }
        for (col, width) in self.column_widths().into_iter().enumerate() {
            sheet.set_column_width(col as u16, width)?;
        }

        workbook.save_to_buffer()
    }
}

/// Convert a record set into spreadsheet bytes.
pub fn export_spreadsheet(records: &[Map<String, Value>]) -> Result<Vec<u8>, AppError> {
    let table = ExportTable::from_rows(records);
    tracing::info!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        "Generating spreadsheet"
    );
    table.to_xlsx()
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
