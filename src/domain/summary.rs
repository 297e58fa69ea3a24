//! Preview, schema, and descriptive statistics for console output.

use crate::domain::stats::{ColumnStats, quantile};
use crate::domain::table::Table;
use crate::domain::value::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Date,
    Text,
    Mixed,
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Number => "number",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
            ColumnKind::Mixed => "mixed",
            ColumnKind::Empty => "empty",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub name: String,
    pub kind: ColumnKind,
    pub non_missing: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescription {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

fn kind_of(table: &Table, idx: usize) -> ColumnKind {
    let mut kind = ColumnKind::Empty;
    for row in table.rows() {
        let cell = match &row[idx] {
            Value::Number(_) => ColumnKind::Number,
            Value::Date(_) => ColumnKind::Date,
            Value::Text(_) => ColumnKind::Text,
            Value::Missing => continue,
        };
        kind = match kind {
            ColumnKind::Empty => cell,
            k if k == cell => k,
            _ => return ColumnKind::Mixed,
        };
    }
    kind
}

pub fn schema(table: &Table) -> Vec<SchemaEntry> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| SchemaEntry {
            name: name.clone(),
            kind: kind_of(table, idx),
            non_missing: table.rows().iter().filter(|r| !r[idx].is_missing()).count(),
        })
        .collect()
}

/// Columns whose present values are all numbers.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    schema(table)
        .into_iter()
        .filter(|e| e.kind == ColumnKind::Number)
        .map(|e| e.name)
        .collect()
}

pub fn describe(table: &Table) -> Vec<ColumnDescription> {
    numeric_columns(table)
        .into_iter()
        .filter_map(|name| {
            let values = table.numbers(&name).ok()?;
            let stats = ColumnStats::from_values(values.iter().copied());
            Some(ColumnDescription {
                count: stats.count,
                mean: stats.mean()?,
                std: stats.sample_std(),
                min: stats.min,
                q1: quantile(&values, 0.25)?,
                median: quantile(&values, 0.5)?,
                q3: quantile(&values, 0.75)?,
                max: stats.max,
                name,
            })
        })
        .collect()
}

/// Render rows as a left-aligned text grid.
fn render_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header);
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn format_preview(table: &Table, n: usize) -> String {
    let rows: Vec<Vec<String>> = table
        .head(n)
        .rows()
        .iter()
        .map(|r| {
            r.iter()
                .map(|v| match v {
                    Value::Missing => "NA".to_string(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();
    render_grid(table.columns(), &rows)
}

pub fn format_schema(table: &Table) -> String {
    let header: Vec<String> = ["column", "kind", "non-missing"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = schema(table)
        .into_iter()
        .map(|e| vec![e.name, e.kind.to_string(), e.non_missing.to_string()])
        .collect();
    let mut out = format!("{} rows x {} columns\n", table.row_count(), table.columns().len());
    out.push_str(&render_grid(&header, &rows));
    out
}

pub fn format_describe(descriptions: &[ColumnDescription]) -> String {
    let header: Vec<String> = ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = descriptions
        .iter()
        .map(|d| {
            vec![
                d.name.clone(),
                d.count.to_string(),
                format!("{:.2}", d.mean),
                d.std.map_or_else(|| "NA".to_string(), |s| format!("{:.2}", s)),
                format!("{:.2}", d.min),
                format!("{:.2}", d.q1),
                format!("{:.2}", d.median),
                format!("{:.2}", d.q3),
                format!("{:.2}", d.max),
            ]
        })
        .collect();
    render_grid(&header, &rows)
}
