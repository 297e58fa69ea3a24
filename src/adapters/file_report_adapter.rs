//! Filesystem report adapter: delimited tables and SVG charts.

use crate::adapters::csv_adapter;
use crate::domain::error::AuditError;
use crate::domain::table::Table;
use crate::ports::report_port::ReportPort;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub struct FileReportAdapter {
    charts_dir: Option<PathBuf>,
}

impl FileReportAdapter {
    /// Charts are written under `charts_dir`; with `None` they are skipped.
    pub fn new(charts_dir: Option<PathBuf>) -> Self {
        Self { charts_dir }
    }

    pub fn chart_path(&self, name: &str) -> Option<PathBuf> {
        self.charts_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.svg", name)))
    }
}

fn ensure_parent(path: &Path) -> Result<(), AuditError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(AuditError::Io)
        }
        _ => Ok(()),
    }
}

impl ReportPort for FileReportAdapter {
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), AuditError> {
        ensure_parent(path)?;
        let file = File::create(path)?;
        csv_adapter::write_table(BufWriter::new(file), table)?;
        log::info!("wrote {} rows to {}", table.row_count(), path.display());
        Ok(())
    }

    fn write_chart(&self, name: &str, svg: &str) -> Result<(), AuditError> {
        let Some(path) = self.chart_path(name) else {
            log::debug!("no charts directory configured; skipping {}", name);
            return Ok(());
        };
        ensure_parent(&path)?;
        fs::write(&path, svg)?;
        log::info!("wrote chart {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::Value;
    use tempfile::TempDir;

    #[test]
    fn writes_table_creating_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/nested/suspicious.csv");
        let table = Table::new(
            vec!["Amount".into(), "Category".into()],
            vec![vec![Value::Number(1500.0), Value::Text("Set".into())]],
        );

        FileReportAdapter::new(None).write_table(&table, &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Amount,Category\n1500,Set\n"
        );
    }

    #[test]
    fn writes_charts_under_dir() {
        let dir = TempDir::new().unwrap();
        let adapter = FileReportAdapter::new(Some(dir.path().join("charts")));
        adapter.write_chart("heatmap", "<svg></svg>").unwrap();
        let written = fs::read_to_string(dir.path().join("charts/heatmap.svg")).unwrap();
        assert_eq!(written, "<svg></svg>");
    }

    #[test]
    fn charts_skipped_without_dir() {
        let adapter = FileReportAdapter::new(None);
        assert_eq!(adapter.chart_path("x"), None);
        adapter.write_chart("x", "<svg/>").unwrap();
    }
}
