//! Analysis configuration: defaults, validation, and construction from a
//! [`ConfigPort`].

use crate::domain::error::AuditError;
use crate::domain::outliers::DEFAULT_Z_THRESHOLD;
use crate::domain::rules::SuspicionRule;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_NUMERIC_COLUMNS: &[&str] = &["Amount", "Total Value", "Unit Cost"];
pub const DEFAULT_DATE_COLUMN: &str = "Date";
pub const DEFAULT_SUSPICIOUS_PATH: &str = "suspicious_transactions.csv";
pub const DEFAULT_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    Synthetic,
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesConfig {
    pub start_date: NaiveDate,
    pub observed_end: NaiveDate,
    pub end_date: NaiveDate,
    pub source: SeriesSource,
    pub value_column: String,
    pub seed: u64,
    pub unit_cost_min: f64,
    pub unit_cost_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub delimiter: u8,
    pub numeric_columns: Vec<String>,
    pub date_column: String,
    pub outlier_column: String,
    pub distribution_column: String,
    pub z_threshold: f64,
    pub cogs: f64,
    pub preview_rows: usize,
    pub rule: SuspicionRule,
    pub series: Option<SeriesConfig>,
    pub suspicious_path: PathBuf,
    pub charts_dir: Option<PathBuf>,
}

fn missing(section: &str, key: &str) -> AuditError {
    AuditError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> AuditError {
    AuditError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Strict numeric read: a present but unparseable value is an error rather
/// than a silent fallback to the default.
fn get_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: Option<f64>,
) -> Result<f64, AuditError> {
    match config.get_string(section, key) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(section, key, "expected a finite number")),
        None => default.ok_or_else(|| missing(section, key)),
    }
}

fn get_integer(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, AuditError> {
    match config.get_string(section, key) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(section, key, "expected an integer")),
        None => Ok(default),
    }
}

/// Single-byte field delimiter. `tab` and `\t` both name the tab character.
fn get_delimiter(config: &dyn ConfigPort) -> Result<u8, AuditError> {
    let Some(raw) = config.get_string("input", "delimiter") else {
        return Ok(DEFAULT_DELIMITER);
    };
    match raw.trim() {
        "" => Ok(DEFAULT_DELIMITER),
        "tab" | "\\t" => Ok(b'\t'),
        other => match other.as_bytes() {
            [b] if b.is_ascii() && !b.is_ascii_alphanumeric() && *b != b'"' => Ok(*b),
            _ => Err(invalid(
                "input",
                "delimiter",
                "expected a single punctuation character or 'tab'",
            )),
        },
    }
}

fn get_date(config: &dyn ConfigPort, section: &str, key: &str) -> Result<NaiveDate, AuditError> {
    let raw = config
        .get_string(section, key)
        .ok_or_else(|| missing(section, key))?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(section, key, "invalid date format (expected YYYY-MM-DD)"))
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str, default: &str) -> String {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn build_series_config(config: &dyn ConfigPort) -> Result<Option<SeriesConfig>, AuditError> {
    let enabled = config.get_bool("series", "enabled", false);
    if config.get_string("series", "start_date").is_none() && !enabled {
        return Ok(None);
    }

    let start_date = get_date(config, "series", "start_date")?;
    let end_date = get_date(config, "series", "end_date")?;
    let observed_end = match config.get_string("series", "observed_end") {
        Some(_) => get_date(config, "series", "observed_end")?,
        None => end_date,
    };

    if start_date > end_date {
        return Err(invalid("series", "start_date", "start_date must not be after end_date"));
    }
    if observed_end < start_date || observed_end > end_date {
        return Err(invalid(
            "series",
            "observed_end",
            "observed_end must lie between start_date and end_date",
        ));
    }

    let source = match non_empty(config, "series", "source", "synthetic")
        .to_lowercase()
        .as_str()
    {
        "synthetic" => SeriesSource::Synthetic,
        "table" => SeriesSource::Table,
        _ => return Err(invalid("series", "source", "expected 'synthetic' or 'table'")),
    };

    let seed = get_integer(config, "series", "seed", 42)?;
    if seed < 0 {
        return Err(invalid("series", "seed", "seed must be non-negative"));
    }

    let unit_cost_min = get_number(config, "series", "unit_cost_min", Some(10.0))?;
    let unit_cost_max = get_number(config, "series", "unit_cost_max", Some(100.0))?;
    if unit_cost_min > unit_cost_max {
        return Err(invalid(
            "series",
            "unit_cost_min",
            "unit_cost_min must not exceed unit_cost_max",
        ));
    }
    if !(unit_cost_max - unit_cost_min).is_finite() {
        return Err(invalid(
            "series",
            "unit_cost_max",
            "unit cost range is too wide to sample",
        ));
    }

    Ok(Some(SeriesConfig {
        start_date,
        observed_end,
        end_date,
        source,
        value_column: non_empty(config, "series", "value_column", "Unit Cost"),
        seed: seed as u64,
        unit_cost_min,
        unit_cost_max,
    }))
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, AuditError> {
    let input_path = config
        .get_string("input", "path")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("input", "path"))?;

    let numeric_columns = config
        .get_list("input", "numeric_columns")
        .unwrap_or_else(|| DEFAULT_NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect());
    if numeric_columns.is_empty() {
        return Err(invalid(
            "input",
            "numeric_columns",
            "at least one numeric column is required",
        ));
    }

    let z_threshold = get_number(config, "analysis", "z_threshold", Some(DEFAULT_Z_THRESHOLD))?;
    if z_threshold <= 0.0 {
        return Err(invalid("analysis", "z_threshold", "z_threshold must be positive"));
    }

    let cogs = get_number(config, "analysis", "cogs", None)?;

    let preview_rows = get_integer(config, "analysis", "preview_rows", 5)?;
    if preview_rows < 0 {
        return Err(invalid("analysis", "preview_rows", "preview_rows must be non-negative"));
    }

    let defaults = SuspicionRule::default();
    let rule = SuspicionRule {
        amount_column: non_empty(config, "rules", "amount_column", &defaults.amount_column),
        category_column: non_empty(config, "rules", "category_column", &defaults.category_column),
        min_amount: get_number(config, "rules", "min_amount", Some(defaults.min_amount))?,
        category: config
            .get_string("rules", "category")
            .unwrap_or(defaults.category),
    };

    Ok(AnalysisConfig {
        input_path: PathBuf::from(input_path),
        delimiter: get_delimiter(config)?,
        numeric_columns,
        date_column: non_empty(config, "input", "date_column", DEFAULT_DATE_COLUMN),
        outlier_column: non_empty(config, "analysis", "outlier_column", "Amount"),
        distribution_column: non_empty(config, "analysis", "distribution_column", "Unit Cost"),
        z_threshold,
        cogs,
        preview_rows: preview_rows as usize,
        rule,
        series: build_series_config(config)?,
        suspicious_path: PathBuf::from(non_empty(
            config,
            "output",
            "suspicious_path",
            DEFAULT_SUSPICIOUS_PATH,
        )),
        charts_dir: config
            .get_string("output", "charts_dir")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
    })
}
