#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use txaudit::domain::config::AnalysisConfig;
use txaudit::domain::error::AuditError;
use txaudit::domain::rules::SuspicionRule;
use txaudit::domain::table::Table;
use txaudit::domain::value::Value;
use txaudit::ports::data_port::TableSource;
use txaudit::ports::report_port::ReportPort;

pub struct MockTableSource {
    pub table: Option<Table>,
}

impl MockTableSource {
    pub fn new(table: Table) -> Self {
        Self { table: Some(table) }
    }

    pub fn failing() -> Self {
        Self { table: None }
    }
}

impl TableSource for MockTableSource {
    fn load(&self) -> Result<Table, AuditError> {
        self.table.clone().ok_or_else(|| AuditError::InputRead {
            path: "<mock>".into(),
            reason: "unavailable".into(),
        })
    }
}

#[derive(Default)]
pub struct RecordingReport {
    pub tables: RefCell<Vec<(PathBuf, Table)>>,
    pub charts: RefCell<Vec<(String, String)>>,
}

impl ReportPort for RecordingReport {
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), AuditError> {
        self.tables
            .borrow_mut()
            .push((path.to_path_buf(), table.clone()));
        Ok(())
    }

    fn write_chart(&self, name: &str, svg: &str) -> Result<(), AuditError> {
        self.charts
            .borrow_mut()
            .push((name.to_string(), svg.to_string()));
        Ok(())
    }
}

pub const HEADER: [&str; 5] = ["Date", "Category", "Amount", "Total Value", "Unit Cost"];

/// Raw (untyped) table from string cells, as a delimited file would load.
pub fn raw_table(rows: &[[&str; 5]]) -> Table {
    Table::new(
        HEADER.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| Value::from_raw(c)).collect())
            .collect(),
    )
}

/// Twenty ordinary transactions, one very large one, and a few malformed rows.
pub fn sample_rows() -> Vec<[&'static str; 5]> {
    let mut rows = vec![
        ["2023-01-01", "Set", "1500", "600", "12.5"],
        ["2023-01-02", "Set", "900", "400", "10"],
        ["2023-01-03", "Other", "2000", "500", "11"],
        ["2023-01-04", "Single", "100", "500", "9.5"],
        ["2023-01-05", "Set", "120", "500", "10.5"],
        ["2023-01-06", "Single", "110", "500", "10"],
        ["2023-01-07", "Single", "130", "500", "10"],
        ["2023-01-08", "Set", "140", "500", "11"],
        ["2023-01-09", "Single", "90", "500", "9"],
        ["2023-01-10", "Single", "95", "500", "9"],
        ["2023-01-11", "Single", "105", "500", "10"],
        ["2023-01-12", "Single", "115", "500", "10"],
        ["2023-01-13", "Single", "125", "500", "10"],
        ["2023-01-14", "Single", "135", "500", "10"],
        ["2023-01-15", "Single", "80", "500", "8"],
        ["2023-01-16", "Single", "85", "500", "8"],
        ["2023-01-17", "Single", "100", "500", "10"],
        ["2023-01-18", "Single", "100", "500", "10"],
        ["2023-01-19", "Single", "100", "500", "10"],
        ["2023-01-20", "Set", "50000", "500", "40"],
    ];
    rows.push(["2023-01-21", "Set", "not a number", "500", "10"]);
    rows.push(["2023-01-22", "Set", "3000", "", "10"]);
    rows.push(["yesterday", "Single", "100", "500", "10"]);
    rows
}

pub fn sample_table() -> Table {
    raw_table(&sample_rows())
}

pub fn sample_config() -> AnalysisConfig {
    AnalysisConfig {
        input_path: PathBuf::from("transactions.csv"),
        delimiter: b',',
        numeric_columns: vec!["Amount".into(), "Total Value".into(), "Unit Cost".into()],
        date_column: "Date".into(),
        outlier_column: "Amount".into(),
        distribution_column: "Unit Cost".into(),
        z_threshold: 3.0,
        cogs: 1500.0,
        preview_rows: 5,
        rule: SuspicionRule::default(),
        series: None,
        suspicious_path: PathBuf::from("out/suspicious.csv"),
        charts_dir: None,
    }
}
