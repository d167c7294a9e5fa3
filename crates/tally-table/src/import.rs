use serde_json::{Map, Value};
use thiserror::Error;

use crate::Table;

/// How repeated `(row, column)` coordinates combine during CSV import.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseMode {
    /// Later cells overwrite earlier ones.
    Overwrite,
    /// Later cells add onto earlier ones; meaningful when a row key appears
    /// on more than one data line.
    Accumulate,
}

/// Errors raised while importing a table from CSV text.
#[derive(Debug, Error)]
pub enum CsvImportError {
    /// A data row's field count differs from the header's.
    #[error("row {row} has {found} fields but the header has {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A cell failed to parse as an integer.
    #[error("cell at row {row}, column {column} is not an integer: {text:?}")]
    CellType {
        row: usize,
        column: usize,
        text: String,
    },
    /// The quote-aware reader failed below the record level.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Errors raised while importing a table from a JSON record array.
#[derive(Debug, Error)]
pub enum JsonImportError {
    /// The input is not a JSON array of flat objects.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A record lacks the designated row-key field.
    #[error("record {record} has no {field:?} field")]
    MissingRowKey { record: usize, field: String },
}

impl Table<i64> {
    /// Parse the comma-separated rendering produced by [`Table::to_csv`].
    ///
    /// The input is trimmed, split into lines on `\n` and into fields on `,`
    /// with no quote handling, mirroring the writer's lossy comma-stripping
    /// escape. The first line is `[title, col1, ...]`; every data line must
    /// have exactly the header's field count. Cells parse as integers and
    /// the table's default value is fixed at zero. Repeated coordinates are
    /// overwritten; see [`Table::parse_with`] to accumulate them instead.
    pub fn parse(input: &str) -> Result<Self, CsvImportError> {
        Self::parse_with(input, ParseMode::Overwrite)
    }

    /// [`Table::parse`] with an explicit combine mode for repeated
    /// coordinates.
    pub fn parse_with(input: &str, mode: ParseMode) -> Result<Self, CsvImportError> {
        let lines: Vec<Vec<&str>> = input
            .trim()
            .split('\n')
            .map(|line| line.split(',').collect())
            .collect();
        from_fields(&lines, mode)
    }

    /// Quote-aware variant of [`Table::parse`] for data whose keys contain
    /// commas, accepting RFC 4180 quoting as produced by
    /// [`Table::to_csv_quoted`]. Shape and integer checks are identical to
    /// the plain parser.
    pub fn parse_quoted(input: &str) -> Result<Self, CsvImportError> {
        Self::parse_quoted_with(input, ParseMode::Overwrite)
    }

    /// [`Table::parse_quoted`] with an explicit combine mode for repeated
    /// coordinates.
    pub fn parse_quoted_with(input: &str, mode: ParseMode) -> Result<Self, CsvImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input.trim().as_bytes());

        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record?);
        }
        let lines: Vec<Vec<&str>> = records.iter().map(|record| record.iter().collect()).collect();
        from_fields(&lines, mode)
    }
}

fn from_fields(lines: &[Vec<&str>], mode: ParseMode) -> Result<Table<i64>, CsvImportError> {
    let Some(header) = lines.first() else {
        return Ok(Table::with_title(0, ""));
    };
    let title = header.first().copied().unwrap_or("");
    let mut table = Table::with_title(0, title);

    for (row, cells) in lines.iter().enumerate().skip(1) {
        if cells.len() != header.len() {
            return Err(CsvImportError::RowShape {
                row,
                expected: header.len(),
                found: cells.len(),
            });
        }
        let row_key = cells.first().copied().unwrap_or("");
        for column in 1..header.len() {
            let text = cells[column];
            let value: i64 = text.trim().parse().map_err(|_| CsvImportError::CellType {
                row,
                column,
                text: text.to_string(),
            })?;
            match mode {
                ParseMode::Overwrite => table.set(row_key, header[column], value),
                ParseMode::Accumulate => table.set_or_add(row_key, header[column], value),
            }
        }
    }

    Ok(table)
}

impl Table<Value> {
    /// Parse a JSON array of flat records into a table.
    ///
    /// `row_key_field` names the field holding each record's row key; every
    /// other field becomes a column holding that field's value. Field order
    /// within a record determines column registration order, and first-seen
    /// order across records wins globally. A non-string row key is rendered
    /// as its JSON literal. The resulting table has no default value and its
    /// title is the row-key field name.
    pub fn parse_json(input: &str, row_key_field: &str) -> Result<Self, JsonImportError> {
        let records: Vec<Map<String, Value>> = serde_json::from_str(input)?;
        let mut table = Table::without_default(row_key_field);

        for (index, record) in records.into_iter().enumerate() {
            let row_key = match record.get(row_key_field) {
                Some(Value::String(key)) => key.clone(),
                Some(other) => other.to_string(),
                None => {
                    return Err(JsonImportError::MissingRowKey {
                        record: index,
                        field: row_key_field.to_string(),
                    })
                }
            };
            for (field, value) in record {
                if field != row_key_field {
                    table.set(row_key.clone(), field, value);
                }
            }
        }

        Ok(table)
    }
}
