//! Record table: an ordered collection of rows sharing one header.

use crate::domain::error::AuditError;
use crate::domain::value::Value;

pub type Row = Vec<Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, padding short rows with missing values and truncating
    /// long ones so every row matches the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of `name` in the header, or a `MissingColumn` error.
    pub fn column_index(&self, name: &str) -> Result<usize, AuditError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| AuditError::MissingColumn {
                column: name.to_string(),
            })
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Present numeric values of a column, in row order.
    pub fn numbers(&self, column: &str) -> Result<Vec<f64>, AuditError> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().filter_map(|r| r[idx].as_number()).collect())
    }

    /// New table with the same header holding the rows accepted by `keep`.
    pub fn filter<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
