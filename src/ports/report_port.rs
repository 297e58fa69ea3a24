//! Output port trait for flagged rows and charts.

use crate::domain::error::AuditError;
use crate::domain::table::Table;
use std::path::Path;

pub trait ReportPort {
    /// Write `table` as a delimited file with its header and no index column.
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), AuditError>;

    /// Persist a rendered SVG chart under `name`.
    fn write_chart(&self, name: &str, svg: &str) -> Result<(), AuditError>;
}
