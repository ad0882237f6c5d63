//! # CSV Record Loader
//!
//! Turns a delimited dataset into `(code, name, key)` records ready for the
//! index. The expected shape is the climate dataset the tool was built
//! around: one row per country, a code column (`ISO3`), a name column
//! (`Country`), and one column per measured year (`F1961`..`F2022`) whose
//! parseable values are averaged into the record key.
//!
//! Column names and the value prefix are configurable, so any dataset with
//! the same "identity columns + repeated measure columns" shape loads
//! without changes.
//!
//! ## Row Handling
//!
//! - A measure cell that is empty or unparseable is skipped, not an error.
//! - A row with no parseable measures at all is dropped.
//! - A row shorter than the identity columns is dropped.
//! - A missing identity column in the *header* is an error: that is a wrong
//!   file, not a sparse row.
//!
//! Parsing is hand-rolled (header split, quote-aware field split); the
//! format is too small to warrant a dependency.

use std::fs;
use std::path::Path;

use eyre::{bail, ensure, eyre, Result, WrapErr};

use crate::config::{DEFAULT_CODE_COLUMN, DEFAULT_NAME_COLUMN, DEFAULT_VALUE_PREFIX};
use crate::tree::AvlIndex;

/// One parsed input record: the tuple fed to [`AvlIndex::insert`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordData {
    pub code: String,
    pub name: String,
    pub key: f64,
}

/// Configurable CSV reader producing [`RecordData`] tuples.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    code_column: String,
    name_column: String,
    value_prefix: String,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            code_column: DEFAULT_CODE_COLUMN.to_string(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            value_prefix: DEFAULT_VALUE_PREFIX.to_string(),
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the identity column headers.
    pub fn with_columns(mut self, code_column: &str, name_column: &str) -> Self {
        self.code_column = code_column.to_string();
        self.name_column = name_column.to_string();
        self
    }

    /// Override the measure-column prefix (columns named `<prefix><digits>`).
    pub fn with_value_prefix(mut self, prefix: &str) -> Self {
        self.value_prefix = prefix.to_string();
        self
    }

    /// Read and parse a CSV file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<RecordData>> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        self.parse(&text)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))
    }

    /// Parse CSV text into records, averaging the measure columns per row.
    pub fn parse(&self, text: &str) -> Result<Vec<RecordData>> {
        let mut lines = text.lines();
        let header = lines.next().ok_or_else(|| eyre!("input is empty"))?;
        let columns = split_fields(header);

        let code_idx = find_column(&columns, &self.code_column)?;
        let name_idx = find_column(&columns, &self.name_column)?;
        let value_idx: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| is_measure_column(c, &self.value_prefix))
            .map(|(i, _)| i)
            .collect();
        ensure!(
            !value_idx.is_empty(),
            "no measure columns named {}<digits> in header",
            self.value_prefix
        );

        let mut records = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(line);
            let (code, name) = match (fields.get(code_idx), fields.get(name_idx)) {
                (Some(code), Some(name)) if !code.is_empty() => (code, name),
                _ => continue,
            };

            let values: Vec<f64> = value_idx
                .iter()
                .filter_map(|&i| fields.get(i))
                .filter_map(|cell| cell.trim().parse::<f64>().ok())
                .collect();
            if values.is_empty() {
                continue;
            }

            let key = values.iter().sum::<f64>() / values.len() as f64;
            records.push(RecordData {
                code: code.clone(),
                name: name.clone(),
                key,
            });
        }

        Ok(records)
    }
}

/// Insert every record into the index, returning how many succeeded.
/// Rejected duplicates are skipped, not fatal: a dataset with two identical
/// averages should still load the rest.
pub fn load_into(index: &mut AvlIndex, records: &[RecordData]) -> usize {
    let mut loaded = 0;
    for record in records {
        if index.insert(&record.code, &record.name, record.key).is_ok() {
            loaded += 1;
        }
    }
    loaded
}

/// The 10-record demo dataset used by `--sample` and the test suites.
pub fn sample_records() -> Vec<RecordData> {
    [
        ("COL", "Colombia", 24.5),
        ("USA", "United States", 12.8),
        ("BRA", "Brazil", 26.2),
        ("CAN", "Canada", 3.7),
        ("MEX", "Mexico", 21.4),
        ("ARG", "Argentina", 14.9),
        ("CHI", "Chile", 11.2),
        ("FRA", "France", 11.8),
        ("ESP", "Spain", 15.6),
        ("JPN", "Japan", 16.1),
    ]
    .into_iter()
    .map(|(code, name, key)| RecordData {
        code: code.to_string(),
        name: name.to_string(),
        key,
    })
    .collect()
}

fn find_column(columns: &[String], wanted: &str) -> Result<usize> {
    match columns.iter().position(|c| c.eq_ignore_ascii_case(wanted)) {
        Some(idx) => Ok(idx),
        None => bail!("missing required column {:?} in header", wanted),
    }
}

/// `F1961` matches prefix `F`; `Flag` does not.
fn is_measure_column(column: &str, prefix: &str) -> bool {
    match column.strip_prefix(prefix) {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Split one CSV line on commas, honoring double-quoted fields (so
/// `"Korea, Rep. of"` stays one field). Doubled quotes inside a quoted
/// field unescape to a single quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current).trim().to_string());
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
