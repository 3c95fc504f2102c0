//! Results Grid Module for TutorPal
//!
//! This module renders query results as a fixed-width text table: one header
//! line, one dashed separator line and one line per row. Every column is as
//! wide as its longest value, capped at [`MAX_COLUMN_WIDTH`]; longer values are
//! shortened with [`truncate_middle`].

use crate::truncate::truncate_middle;
use std::io::{self, Write};

/// Upper bound on the display width of any column.
pub const MAX_COLUMN_WIDTH: usize = 16;

/// Delimiter placed between adjacent columns.
pub const COLUMN_SEPARATOR: &str = " | ";

/// Headers plus rows of already-stringified cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsGrid {
    /// Creates a new, empty ResultsGrid.
    pub fn new() -> Self {
        ResultsGrid::default()
    }

    /// Creates a grid from headers and rows in one go.
    pub fn with_data(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        ResultsGrid { headers, rows }
    }

    /// Sets the headers for the grid.
    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
    }

    /// Adds a row to the grid. Cells are matched to headers by position.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Display width of every column, in header order.
    ///
    /// A column is as wide as the longest of its header and cells, but never
    /// wider than [`MAX_COLUMN_WIDTH`].
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let widest_cell = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                header.chars().count().max(widest_cell).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Renders the grid, one `\n`-terminated line per header, separator and row.
    ///
    /// The separator is exactly as long as the header line. Rows with fewer
    /// cells than headers get blank cells; surplus cells are not shown.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut output = String::new();

        output.push_str(&format_line(&self.headers, &widths));
        output.push('\n');

        let separator_len = widths.iter().sum::<usize>()
            + COLUMN_SEPARATOR.len() * widths.len().saturating_sub(1);
        output.push_str(&"-".repeat(separator_len));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format_line(row, &widths));
            output.push('\n');
        }
        output
    }

    /// Writes the rendered grid to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())
    }
}

/// Truncates, pads and joins one line of cells.
fn format_line(cells: &[String], widths: &[usize]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(i, &width)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}", truncate_middle(cell, width), width = width)
        })
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
}
