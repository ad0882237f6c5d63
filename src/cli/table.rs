//! # ASCII Table Formatter
//!
//! Renders record lists as ASCII tables with box-drawing characters, in the
//! familiar MySQL-CLI style.
//!
//! ## Output Format
//!
//! ```text
//! +------+---------------+-------+
//! | Code | Name          |   Key |
//! +------+---------------+-------+
//! | BRA  | Brazil        | 26.20 |
//! | COL  | Colombia      | 24.50 |
//! +------+---------------+-------+
//! ```
//!
//! ## Column Width Calculation
//!
//! Column widths are the maximum of the header length and the longest value
//! in that column, capped at [`MAX_COLUMN_WIDTH`] (longer values are
//! truncated with `...`).
//!
//! ## Alignment
//!
//! Cells that parse as numbers are right-aligned; everything else is
//! left-aligned.

use std::fmt::Write;

use crate::tree::{AvlIndex, NodeId};

const MAX_COLUMN_WIDTH: usize = 50;

pub struct TableFormatter {
    headers: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TableFormatter {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len().max(1)).collect();

        for row in &rows {
            for (i, value) in row.iter().enumerate() {
                if i < widths.len() {
                    // Char count, not byte length: multi-byte names must not
                    // inflate the column.
                    widths[i] = widths[i].max(value.chars().count()).min(MAX_COLUMN_WIDTH);
                }
            }
        }

        Self {
            headers,
            widths,
            rows,
        }
    }

    /// Format a list of records as a Code | Name | Key table.
    pub fn records(index: &AvlIndex, ids: &[NodeId]) -> Self {
        let rows = ids
            .iter()
            .filter_map(|&id| index.get(id))
            .map(|node| {
                vec![
                    node.code().to_string(),
                    node.name().to_string(),
                    format!("{:.2}", node.key()),
                ]
            })
            .collect();

        Self::new(
            vec!["Code".to_string(), "Name".to_string(), "Key".to_string()],
            rows,
        )
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        self.write_separator(&mut output);
        self.write_row(&mut output, &self.headers, false);
        self.write_separator(&mut output);

        for row in &self.rows {
            self.write_row(&mut output, row, true);
        }

        self.write_separator(&mut output);
        output
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn write_separator(&self, output: &mut String) {
        output.push('+');
        for width in &self.widths {
            for _ in 0..(*width + 2) {
                output.push('-');
            }
            output.push('+');
        }
        output.push('\n');
    }

    fn write_row(&self, output: &mut String, row: &[String], align_numbers: bool) {
        output.push('|');
        for (i, width) in self.widths.iter().enumerate() {
            let raw = row.get(i).map(String::as_str).unwrap_or("");
            let value = truncate(raw, *width);

            let right_align = align_numbers && raw.parse::<f64>().is_ok();
            if right_align {
                let _ = write!(output, " {:>width$} |", value, width = width);
            } else {
                let _ = write!(output, " {:<width$} |", value, width = width);
            }
        }
        output.push('\n');
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else if width <= 3 {
        value.chars().take(width).collect()
    } else {
        let mut truncated: String = value.chars().take(width - 3).collect();
        truncated.push_str("...");
        truncated
    }
}
