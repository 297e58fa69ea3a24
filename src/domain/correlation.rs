//! Pearson correlation over numeric columns.

use crate::domain::error::AuditError;
use crate::domain::summary::numeric_columns;
use crate::domain::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `None` where fewer than two complete pairs exist or either
    /// side has zero variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        self.values.get(a).and_then(|row| row.get(b)).copied().flatten()
    }
}

/// Pearson coefficient over pairwise-complete observations.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

pub fn correlation_matrix(table: &Table) -> Result<CorrelationMatrix, AuditError> {
    let columns = numeric_columns(table);
    let indices = columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Result<Vec<_>, _>>()?;

    let values = indices
        .iter()
        .map(|&a| {
            indices
                .iter()
                .map(|&b| {
                    let pairs: Vec<(f64, f64)> = table
                        .rows()
                        .iter()
                        .filter_map(|r| Some((r[a].as_number()?, r[b].as_number()?)))
                        .collect();
                    pearson(&pairs)
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix { columns, values })
}
