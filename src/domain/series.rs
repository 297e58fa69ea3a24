//! Daily series builder: date-range reindexing and per-date median.
//!
//! Observations are left-joined onto every calendar day of a range, so gaps
//! survive as `None` instead of being dropped, then aggregated per date.

use crate::domain::error::AuditError;
use crate::domain::stats::median;
use crate::domain::table::Table;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Every calendar day in `[start, end]`.
pub fn daily_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AuditError> {
    if start > end {
        return Err(AuditError::InvalidDateRange { start, end });
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

/// Left join of the full range onto `observations` by exact date. A day with
/// several observations produces several rows; a day with none produces one
/// row carrying `None`. Observations outside the range are dropped.
pub fn reindex_daily(
    observations: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SeriesPoint>, AuditError> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        by_date.entry(obs.date).or_default().push(obs.value);
    }

    let mut joined = Vec::new();
    for date in daily_range(start, end)? {
        match by_date.get(&date) {
            Some(values) => joined.extend(values.iter().map(|&v| SeriesPoint {
                date,
                value: Some(v),
            })),
            None => joined.push(SeriesPoint { date, value: None }),
        }
    }
    Ok(joined)
}

/// Group rows by date, taking the median of present values. Output is sorted
/// by date with one point per distinct date.
pub fn median_by_date(rows: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let mut groups: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let values = groups.entry(row.date).or_default();
        if let Some(v) = row.value.filter(|v| v.is_finite()) {
            values.push(v);
        }
    }
    groups
        .into_iter()
        .map(|(date, values)| SeriesPoint {
            date,
            value: median(&values),
        })
        .collect()
}

/// Reindex onto `[start, end]` then aggregate by median per date.
pub fn build_daily_series(
    observations: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SeriesPoint>, AuditError> {
    let joined = reindex_daily(observations, start, end)?;
    let series = median_by_date(&joined);
    log::debug!(
        "daily series {} to {}: {} days, {} missing",
        start,
        end,
        series.len(),
        series.iter().filter(|p| p.value.is_none()).count()
    );
    Ok(series)
}

/// Seeded pseudo-random unit costs, one per day of `[start, end]`.
///
/// `max - min` must be finite; wider bounds cannot be sampled uniformly.
pub fn synthetic_observations(
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
    min: f64,
    max: f64,
) -> Result<Vec<Observation>, AuditError> {
    if !(max - min).is_finite() || min > max {
        return Err(AuditError::ConfigInvalid {
            section: "series".into(),
            key: "unit_cost_max".into(),
            reason: format!("cannot sample unit costs between {min} and {max}"),
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(daily_range(start, end)?
        .into_iter()
        .map(|date| Observation {
            date,
            value: if max > min { rng.gen_range(min..max) } else { min },
        })
        .collect())
}

/// Observations from a cleaned table's date and value columns. Rows with a
/// missing date or value are skipped.
pub fn observations_from_table(
    table: &Table,
    date_column: &str,
    value_column: &str,
) -> Result<Vec<Observation>, AuditError> {
    let date_idx = table.column_index(date_column)?;
    let value_idx = table.column_index(value_column)?;
    Ok(table
        .rows()
        .iter()
        .filter_map(|r| {
            Some(Observation {
                date: r[date_idx].as_date()?,
                value: r[value_idx].as_number()?,
            })
        })
        .collect())
}
