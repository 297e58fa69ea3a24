//! Inventory turnover ratio.

use crate::domain::error::AuditError;
use crate::domain::stats::ColumnStats;
use crate::domain::table::Table;

pub const INVENTORY_VALUE_COLUMN: &str = "Total Value";

/// `cogs / mean(Total Value)`.
pub fn inventory_turnover(table: &Table, cogs: f64) -> Result<f64, AuditError> {
    inventory_turnover_over(table, INVENTORY_VALUE_COLUMN, cogs)
}

/// Turnover against the mean of an arbitrary inventory value column. An empty
/// column or a zero mean is reported as `ZeroAverageInventory`.
pub fn inventory_turnover_over(table: &Table, column: &str, cogs: f64) -> Result<f64, AuditError> {
    let stats = ColumnStats::from_values(table.numbers(column)?);
    match stats.mean() {
        Some(mean) if mean != 0.0 => Ok(cogs / mean),
        _ => Err(AuditError::ZeroAverageInventory {
            column: column.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::Value;

    fn values(v: &[f64]) -> Table {
        Table::new(
            vec![INVENTORY_VALUE_COLUMN.into()],
            v.iter().map(|&x| vec![Value::Number(x)]).collect(),
        )
    }

    #[test]
    fn cogs_over_mean() {
        let t = values(&[400.0, 500.0, 600.0]);
        assert_eq!(inventory_turnover(&t, 1500.0).unwrap(), 3.0);
    }

    #[test]
    fn empty_table_is_an_error() {
        let err = inventory_turnover(&values(&[]), 1500.0).unwrap_err();
        assert!(matches!(err, AuditError::ZeroAverageInventory { .. }));
    }

    #[test]
    fn zero_mean_is_an_error() {
        let err = inventory_turnover(&values(&[0.0, 0.0]), 1500.0).unwrap_err();
        assert!(matches!(err, AuditError::ZeroAverageInventory { column } if column == "Total Value"));
        let err = inventory_turnover(&values(&[-5.0, 5.0]), 1500.0).unwrap_err();
        assert!(matches!(err, AuditError::ZeroAverageInventory { .. }));
    }

    #[test]
    fn missing_column_is_an_error() {
        let t = Table::new(vec!["Amount".into()], vec![]);
        let err = inventory_turnover(&t, 1.0).unwrap_err();
        assert!(matches!(err, AuditError::MissingColumn { .. }));
    }
}
