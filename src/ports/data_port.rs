//! Tabular data source port trait.

use crate::domain::error::AuditError;
use crate::domain::table::Table;

pub trait TableSource {
    /// Load the raw table. Cells are untyped text or missing; typing happens
    /// during cleaning.
    fn load(&self) -> Result<Table, AuditError>;
}
