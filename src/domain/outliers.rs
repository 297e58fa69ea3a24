//! Z-score outlier detection.

use crate::domain::error::AuditError;
use crate::domain::stats::ColumnStats;
use crate::domain::table::Table;

pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Per-row flags: `true` where the `column` value deviates from the column
/// mean by more than `threshold` sample standard deviations.
///
/// Mean and deviation are taken over every present value of the input,
/// outliers included. Fewer than two values, or a constant column, flags
/// nothing. Missing cells are never flagged.
pub fn outlier_mask(table: &Table, column: &str, threshold: f64) -> Result<Vec<bool>, AuditError> {
    let idx = table.column_index(column)?;
    let stats = ColumnStats::from_values(table.rows().iter().filter_map(|r| r[idx].as_number()));

    let (mean, std) = match (stats.mean(), stats.sample_std()) {
        (Some(mean), Some(std)) if !stats.is_constant() && std.is_finite() => (mean, std),
        _ => return Ok(vec![false; table.row_count()]),
    };
    let limit = threshold * std;

    Ok(table
        .rows()
        .iter()
        .map(|r| r[idx].as_number().is_some_and(|x| (x - mean).abs() > limit))
        .collect())
}

/// Rows flagged by [`outlier_mask`].
pub fn detect_outliers(table: &Table, column: &str, threshold: f64) -> Result<Table, AuditError> {
    let mut flags = outlier_mask(table, column, threshold)?.into_iter();
    Ok(table.filter(|_| flags.next().unwrap_or(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::Value;

    fn amounts(values: &[f64]) -> Table {
        Table::new(
            vec!["Amount".into()],
            values.iter().map(|&v| vec![Value::Number(v)]).collect(),
        )
    }

    fn with_spike() -> Table {
        let mut values = vec![10.0; 20];
        values.push(1000.0);
        amounts(&values)
    }

    #[test]
    fn flags_the_spike() {
        let out = detect_outliers(&with_spike(), "Amount", 3.0).unwrap();
        assert_eq!(out.numbers("Amount").unwrap(), vec![1000.0]);
    }

    #[test]
    fn statistics_include_the_outliers() {
        // With 3 values the maximum possible z-score is (n-1)/sqrt(n) ~ 1.15,
        // so nothing clears 3 when the spike inflates the deviation.
        let out = detect_outliers(&amounts(&[10.0, 10.0, 1000.0]), "Amount", 3.0).unwrap();
        assert!(out.is_empty());
        let out = detect_outliers(&amounts(&[10.0, 10.0, 1000.0]), "Amount", 1.0).unwrap();
        assert_eq!(out.row_count(), 1);
    }

    #[test]
    fn lower_threshold_flags_more() {
        let table = amounts(&[1.0, 2.0, 3.0, 4.0, 100.0]);
        let strict = detect_outliers(&table, "Amount", 3.0).unwrap();
        let loose = detect_outliers(&table, "Amount", 0.5).unwrap();
        assert!(loose.row_count() > strict.row_count());
    }

    #[test]
    fn idempotent() {
        let table = with_spike();
        let first = detect_outliers(&table, "Amount", 3.0).unwrap();
        let second = detect_outliers(&table, "Amount", 3.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn constant_column_has_no_outliers() {
        let table = amounts(&[0.1; 10]);
        for threshold in [0.001, 0.5, 1.0, 3.0] {
            assert!(detect_outliers(&table, "Amount", threshold).unwrap().is_empty());
        }
    }

    #[test]
    fn fewer_than_two_rows_has_no_outliers() {
        assert!(detect_outliers(&amounts(&[]), "Amount", 3.0).unwrap().is_empty());
        assert!(detect_outliers(&amounts(&[5.0]), "Amount", 3.0).unwrap().is_empty());
    }

    #[test]
    fn missing_values_are_skipped() {
        let mut table_rows: Vec<Vec<Value>> = (0..20).map(|_| vec![Value::Number(10.0)]).collect();
        table_rows.push(vec![Value::Missing]);
        table_rows.push(vec![Value::Number(1000.0)]);
        let table = Table::new(vec!["Amount".into()], table_rows);

        let out = detect_outliers(&table, "Amount", 3.0).unwrap();
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.numbers("Amount").unwrap(), vec![1000.0]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = detect_outliers(&with_spike(), "Unit Cost", 3.0).unwrap_err();
        assert!(matches!(err, AuditError::MissingColumn { .. }));
    }

    #[test]
    fn mask_lines_up_with_rows() {
        let mask = outlier_mask(&with_spike(), "Amount", 3.0).unwrap();
        assert_eq!(mask.len(), 21);
        assert_eq!(mask.iter().filter(|&&f| f).count(), 1);
        assert!(mask[20]);
    }
}
