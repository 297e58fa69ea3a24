//! Loader/cleaner: numeric coercion, row dropping, and date parsing.

use crate::domain::error::AuditError;
use crate::domain::table::{Row, Table};
use crate::domain::value::Value;

/// What cleaning discarded along the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningSummary {
    /// Rows removed for a missing designated value.
    pub dropped: usize,
    /// Kept rows whose non-blank date cell did not parse. Blank cells are not
    /// counted.
    pub unparsed_dates: usize,
}

/// Coerce `numeric_columns` to numbers and drop every row where any of them
/// is missing afterwards. If `date_column` names a column present in the
/// header, its cells are parsed into dates; failures become missing and the
/// row is kept. The input table is left untouched.
pub fn clean_table(
    raw: &Table,
    numeric_columns: &[String],
    date_column: Option<&str>,
) -> Result<Table, AuditError> {
    clean_table_summarized(raw, numeric_columns, date_column).map(|(table, _)| table)
}

/// [`clean_table`] plus a count of what was dropped or left unparsed.
pub fn clean_table_summarized(
    raw: &Table,
    numeric_columns: &[String],
    date_column: Option<&str>,
) -> Result<(Table, CleaningSummary), AuditError> {
    let numeric_idx = numeric_columns
        .iter()
        .map(|c| raw.column_index(c))
        .collect::<Result<Vec<_>, _>>()?;
    let date_idx = date_column.and_then(|c| raw.column_index(c).ok());

    let mut rows: Vec<Row> = Vec::with_capacity(raw.row_count());
    let mut summary = CleaningSummary::default();

    for raw_row in raw.rows() {
        let mut row = raw_row.clone();
        for &idx in &numeric_idx {
            row[idx] = row[idx].to_numeric();
        }
        if numeric_idx.iter().any(|&idx| row[idx].is_missing()) {
            summary.dropped += 1;
            continue;
        }
        if let Some(idx) = date_idx {
            let parsed = row[idx].to_date();
            if parsed.is_missing() && matches!(&row[idx], Value::Text(t) if !t.trim().is_empty()) {
                summary.unparsed_dates += 1;
            }
            row[idx] = parsed;
        }
        rows.push(row);
    }

    log::debug!(
        "cleaning kept {} of {} rows ({} dropped)",
        rows.len(),
        raw.row_count(),
        summary.dropped
    );

    Ok((Table::new(raw.columns().to_vec(), rows), summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn text(s: &str) -> Value {
        Value::from_raw(s)
    }

    fn designated() -> Vec<String> {
        vec!["Amount".into(), "Unit Cost".into()]
    }

    fn raw_table(rows: &[[&str; 4]]) -> Table {
        Table::new(
            vec![
                "Amount".into(),
                "Category".into(),
                "Unit Cost".into(),
                "Date".into(),
            ],
            rows.iter()
                .map(|r| r.iter().map(|c| text(c)).collect())
                .collect(),
        )
    }

    #[test]
    fn coerces_designated_columns() {
        let raw = raw_table(&[["1500", "Set", "12.5", "2023-01-01"]]);
        let cleaned = clean_table(&raw, &designated(), Some("Date")).unwrap();

        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(cleaned.get(0, "Amount"), Some(&Value::Number(1500.0)));
        assert_eq!(cleaned.get(0, "Unit Cost"), Some(&Value::Number(12.5)));
        assert_eq!(cleaned.get(0, "Category"), Some(&Value::Text("Set".into())));
        assert_eq!(
            cleaned.get(0, "Date"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()))
        );
    }

    #[test]
    fn drops_rows_with_bad_numeric_values() {
        let raw = raw_table(&[
            ["1500", "Set", "12.5", "2023-01-01"],
            ["oops", "Set", "12.5", "2023-01-02"],
            ["200", "Other", "", "2023-01-03"],
            ["300", "Other", "4", "2023-01-04"],
        ]);
        let cleaned = clean_table(&raw, &designated(), Some("Date")).unwrap();

        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(cleaned.numbers("Amount").unwrap(), vec![1500.0, 300.0]);
    }

    #[test]
    fn keeps_rows_with_bad_dates() {
        let raw = raw_table(&[
            ["1500", "Set", "12.5", "garbage"],
            ["100", "Set", "1", ""],
        ]);
        let (cleaned, summary) = clean_table_summarized(&raw, &designated(), Some("Date")).unwrap();

        assert_eq!(cleaned.row_count(), 2);
        assert!(cleaned.get(0, "Date").unwrap().is_missing());
        assert!(cleaned.get(1, "Date").unwrap().is_missing());
        // the blank cell had no date to parse
        assert_eq!(summary.unparsed_dates, 1);
    }

    #[test]
    fn summary_ignores_dates_on_dropped_rows() {
        let raw = raw_table(&[
            ["oops", "Set", "12.5", "garbage"],
            ["100", "Set", "1", "2023-01-05"],
            ["100", "Set", "1", "  "],
        ]);
        let (cleaned, summary) = clean_table_summarized(&raw, &designated(), Some("Date")).unwrap();

        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(
            summary,
            CleaningSummary {
                dropped: 1,
                unparsed_dates: 0
            }
        );
    }

    #[test]
    fn absent_date_column_is_ignored() {
        let raw = Table::new(
            vec!["Amount".into(), "Unit Cost".into()],
            vec![vec![text("1"), text("2")]],
        );
        let (cleaned, summary) = clean_table_summarized(&raw, &designated(), Some("Date")).unwrap();
        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(summary.unparsed_dates, 0);
    }

    #[test]
    fn missing_designated_column_fails_fast() {
        let raw = Table::new(vec!["Amount".into()], vec![vec![text("1")]]);
        let err = clean_table(&raw, &designated(), None).unwrap_err();
        assert!(matches!(err, AuditError::MissingColumn { column } if column == "Unit Cost"));
    }

    #[test]
    fn raw_input_is_not_mutated() {
        let raw = raw_table(&[["oops", "Set", "1", "2023-01-01"], ["5", "Set", "1", "x"]]);
        let snapshot = raw.clone();
        let _ = clean_table(&raw, &designated(), Some("Date")).unwrap();
        assert_eq!(raw, snapshot);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let raw = raw_table(&[]);
        let cleaned = clean_table(&raw, &designated(), Some("Date")).unwrap();
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.columns(), raw.columns());
    }

    fn cell() -> impl Strategy<Value = String> {
        prop_oneof![
            (-1.0e6f64..1.0e6).prop_map(|n| n.to_string()),
            Just(String::new()),
            "[a-z]{1,5}",
            Just("NaN".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn cleaned_rows_hold_numbers_in_designated_columns(
            rows in prop::collection::vec((cell(), cell(), cell()), 0..40)
        ) {
            let raw = Table::new(
                vec!["Amount".into(), "Category".into(), "Unit Cost".into()],
                rows.iter()
                    .map(|(a, c, u)| vec![text(a), text(c), text(u)])
                    .collect(),
            );
            let cleaned = clean_table(&raw, &designated(), None).unwrap();

            prop_assert!(cleaned.row_count() <= raw.row_count());
            for row in cleaned.rows() {
                prop_assert!(row[0].as_number().is_some_and(f64::is_finite));
                prop_assert!(row[2].as_number().is_some_and(f64::is_finite));
            }
        }
    }
}
