/// Query Execution Module
///
/// This module issues parameterized statements against an open scope and
/// exposes their results cursor-style: fetch one row, fetch the rest, or ask
/// for the column names of the last statement.

use crate::core::Result;
use rusqlite::{types::Value, Connection, Params};
use std::collections::VecDeque;

/// A single result row, holding owned SQLite values in column order
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    values: Vec<Value>,
}

impl ResultRow {
    /// Creates a row from values in column order
    pub fn new(values: Vec<Value>) -> Self {
        ResultRow { values }
    }

    /// Raw values in column order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of columns in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text value at `index`, if the column holds text
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.values.get(index)? {
            Value::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Numeric value at `index` widened to `f64`
    ///
    /// SQLite may hand back an INTEGER for a REAL column holding a whole
    /// number, so both storage classes are accepted.
    pub fn real(&self, index: usize) -> Option<f64> {
        match self.values.get(index)? {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer value at `index`
    pub fn integer(&self, index: usize) -> Option<i64> {
        match self.values.get(index)? {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Every value formatted for display
    pub fn display_values(&self) -> Vec<String> {
        self.values.iter().map(format_value).collect()
    }
}

/// Query execution service that operates on a scoped connection
///
/// Every `execute` call runs in its own transaction and is committed before
/// returning, so a failed statement never leaves partial writes behind.
/// Result rows are buffered and handed out by `fetch_one` / `fetch_all`.
pub struct QueryExecutor<'a> {
    connection: &'a Connection,
    columns: Vec<String>,
    pending: VecDeque<ResultRow>,
    rows_affected: usize,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new QueryExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        QueryExecutor {
            connection,
            columns: Vec::new(),
            pending: VecDeque::new(),
            rows_affected: 0,
        }
    }

    /// Executes one statement with positionally bound parameters
    ///
    /// # Arguments
    ///
    /// * `sql` - The SQL statement, using `?N` placeholders for every value
    /// * `params` - Values bound to the placeholders, usually via `params![]`
    ///
    /// # Returns
    ///
    /// The number of rows changed by a write statement, or `0` for statements
    /// that return rows.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::StoreUnavailable` if the statement cannot be
    /// prepared, fails while running, or cannot be committed. Results of the
    /// previous statement are discarded either way.
    pub fn execute<P: Params>(&mut self, sql: &str, params: P) -> Result<usize> {
        self.columns.clear();
        self.pending.clear();
        self.rows_affected = 0;

        let tx = self.connection.unchecked_transaction()?;
        let (columns, rows, rows_affected) = {
            let mut stmt = tx.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let column_count = stmt.column_count();

            if column_count == 0 {
                let changed = stmt.execute(params)?;
                (columns, VecDeque::new(), changed)
            } else {
                let mut fetched = VecDeque::new();
                let mut rows = stmt.query(params)?;
                while let Some(row) = rows.next()? {
                    let mut values = Vec::with_capacity(column_count);
                    for i in 0..column_count {
                        values.push(row.get::<_, Value>(i)?);
                    }
                    fetched.push_back(ResultRow::new(values));
                }
                (columns, fetched, 0)
            }
        };
        tx.commit()?;

        self.columns = columns;
        self.pending = rows;
        self.rows_affected = rows_affected;
        Ok(rows_affected)
    }

    /// Returns the next result row, or `None` once the rows are exhausted
    pub fn fetch_one(&mut self) -> Option<ResultRow> {
        self.pending.pop_front()
    }

    /// Returns every remaining result row in order
    pub fn fetch_all(&mut self) -> Vec<ResultRow> {
        self.pending.drain(..).collect()
    }

    /// Column names of the most recently executed statement
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows changed by the most recently executed write statement
    pub fn rows_affected(&self) -> usize {
        self.rows_affected
    }
}

/// Formats a SQLite value for display
///
/// Reals keep a fractional part (`20.0`, not `20`) so prices read as money
/// amounts rather than counts.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format!("{:?}", f),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<BLOB: {} bytes>", b.len()),
    }
}
