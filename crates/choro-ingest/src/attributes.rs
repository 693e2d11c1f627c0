//! Attribute tables read from delimited text.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::info;

use crate::error::{LoadError, Result};

/// Lowercased column names recognized as the value column.
pub const VALUE_COLUMN_NAMES: &[&str] = &["value", "val", "значение", "indicator", "показатель"];

/// Options for reading delimited text.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// A header row plus data rows, every row padded to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTable {
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut normalized = String::new();
    for (n, part) in trimmed.split_whitespace().enumerate() {
        if n > 0 {
            normalized.push(' ');
        }
        normalized.push_str(part);
    }
    if normalized.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        normalized
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

impl AttributeTable {
    /// Read a delimited text file with a header row.
    ///
    /// Fails when the file cannot be read or parsed, or has no data rows.
    pub fn load(path: &Path, options: &CsvOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| LoadError::from_io(path, e))?;
        Self::from_reader(file, path, options)
    }

    /// Read from any reader. `source` is only used for messages.
    pub fn from_reader<R: Read>(reader: R, source: &Path, options: &CsvOptions) -> Result<Self> {
        let parse_error = |e: csv::Error| LoadError::CsvParse {
            path: source.to_path_buf(),
            message: e.to_string(),
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(parse_error)?
            .iter()
            .enumerate()
            .map(|(idx, raw)| normalize_header(raw, idx))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(parse_error)?;
            if record.iter().all(|value| value.trim().is_empty()) {
                continue;
            }
            let row: Vec<String> = (0..headers.len())
                .map(|idx| record.get(idx).map(normalize_cell).unwrap_or_default())
                .collect();
            rows.push(row);
        }

        if headers.is_empty() || rows.is_empty() {
            return Err(LoadError::EmptyCsv {
                path: source.to_path_buf(),
            });
        }

        info!(
            path = %source.display(),
            columns = headers.len(),
            rows = rows.len(),
            "loaded attribute table"
        );
        Ok(Self {
            source: source.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn columns(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Guess the key and value columns.
    ///
    /// The key is the first column. The value is the first column whose
    /// lowercased name is in [`VALUE_COLUMN_NAMES`].
    pub fn infer_key_and_value_columns(&self) -> (Option<&str>, Option<&str>) {
        let key = self.headers.first().map(String::as_str);
        let value = self
            .headers
            .iter()
            .find(|name| VALUE_COLUMN_NAMES.contains(&name.to_lowercase().as_str()))
            .map(String::as_str);
        (key, value)
    }
}
