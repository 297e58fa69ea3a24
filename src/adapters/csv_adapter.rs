//! Delimited file adapter: loads raw tables and writes flagged rows.

use crate::domain::error::AuditError;
use crate::domain::table::{Row, Table};
use crate::domain::value::Value;
use crate::ports::data_port::TableSource;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    path: PathBuf,
    delimiter: u8,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse delimited text into an untyped table. The first record is the
/// header; short records are padded with missing cells.
pub fn read_table<R: io::Read>(reader: R, delimiter: u8) -> Result<Table, AuditError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows: Vec<Row> = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > columns.len() {
            return Err(AuditError::InputMalformed {
                record: i + 1,
                reason: format!(
                    "{} fields but the header has {}",
                    record.len(),
                    columns.len()
                ),
            });
        }
        rows.push(record.iter().map(Value::from_raw).collect());
    }

    Ok(Table::new(columns, rows))
}

/// Write `table` with its header and no index column. Missing cells are
/// written empty.
pub fn write_table<W: io::Write>(writer: W, table: &Table) -> Result<(), AuditError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

impl TableSource for CsvAdapter {
    fn load(&self) -> Result<Table, AuditError> {
        let content = fs::read(&self.path).map_err(|e| AuditError::InputRead {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let table = read_table(content.as_slice(), self.delimiter)?;
        log::info!(
            "loaded {} rows x {} columns from {}",
            table.row_count(),
            table.columns().len(),
            self.path.display()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "Date,Category,Amount,Total Value,Unit Cost\n\
        2023-01-01,Set,1500,3000,12.5\n\
        2023-01-02,Other,n/a,100,2\n\
        2023-01-03,Set,900\n";

    #[test]
    fn reads_header_and_untyped_cells() {
        let table = read_table(SAMPLE.as_bytes(), b',').unwrap();

        assert_eq!(
            table.columns(),
            &["Date", "Category", "Amount", "Total Value", "Unit Cost"]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get(0, "Amount"), Some(&Value::Text("1500".into())));
        assert_eq!(table.get(1, "Amount"), Some(&Value::Text("n/a".into())));
    }

    #[test]
    fn short_records_are_padded_with_missing() {
        let table = read_table(SAMPLE.as_bytes(), b',').unwrap();
        assert!(table.get(2, "Total Value").unwrap().is_missing());
        assert!(table.get(2, "Unit Cost").unwrap().is_missing());
    }

    #[test]
    fn long_records_are_rejected() {
        let err = read_table("a,b\n1,2,3\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, AuditError::InputMalformed { record: 1, .. }));
    }

    #[test]
    fn alternate_delimiter() {
        let table = read_table("a;b\n1;2\n".as_bytes(), b';').unwrap();
        assert_eq!(table.get(0, "b"), Some(&Value::Text("2".into())));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let table = read_table("Category,Amount\n\"Set, large\",5\n".as_bytes(), b',').unwrap();
        assert_eq!(table.get(0, "Category"), Some(&Value::Text("Set, large".into())));
    }

    #[test]
    fn write_has_header_and_no_index() {
        let table = Table::new(
            vec!["Amount".into(), "Category".into(), "Note".into()],
            vec![vec![
                Value::Number(1500.0),
                Value::Text("Set".into()),
                Value::Missing,
            ]],
        );
        let mut buf = Vec::new();
        write_table(&mut buf, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Amount,Category,Note\n1500,Set,\n");
    }

    #[test]
    fn write_empty_table_keeps_header() {
        let table = Table::new(vec!["Amount".into(), "Category".into()], vec![]);
        let mut buf = Vec::new();
        write_table(&mut buf, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Amount,Category\n");
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tx.csv");
        fs::write(&path, SAMPLE).unwrap();

        let table = CsvAdapter::new(path).load().unwrap();
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn load_with_configured_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tx.tsv");
        fs::write(&path, "Amount\tCategory\n1500\tSet\n").unwrap();

        let table = CsvAdapter::new(path).with_delimiter(b'\t').load().unwrap();
        assert_eq!(table.columns(), &["Amount", "Category"]);
        assert_eq!(table.get(0, "Category"), Some(&Value::Text("Set".into())));
    }

    #[test]
    fn load_missing_file_is_input_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().join("absent.csv"));
        let err = adapter.load().unwrap_err();
        assert!(matches!(err, AuditError::InputRead { .. }));
        assert!(adapter.path().ends_with("absent.csv"));
    }
}
