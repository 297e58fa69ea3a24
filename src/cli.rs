//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_report_adapter::FileReportAdapter;
use crate::adapters::svg_chart;
use crate::domain::cleaning::{clean_table, clean_table_summarized};
use crate::domain::config::{AnalysisConfig, SeriesConfig, SeriesSource, build_analysis_config};
use crate::domain::correlation::correlation_matrix;
use crate::domain::distribution::{box_stats, density_curve, histogram};
use crate::domain::error::AuditError;
use crate::domain::outliers::{detect_outliers, outlier_mask};
use crate::domain::rules::identify_suspicious_with;
use crate::domain::series::{
    SeriesPoint, build_daily_series, observations_from_table, synthetic_observations,
};
use crate::domain::summary::{describe, format_describe, format_preview, format_schema};
use crate::domain::table::Table;
use crate::domain::turnover::inventory_turnover;
use crate::ports::data_port::TableSource;
use crate::ports::report_port::ReportPort;

const HISTOGRAM_BINS: usize = 20;
const DENSITY_POINTS: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "txaudit", about = "Transaction and inventory audit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clean the input, flag outliers and suspicious rows, compute turnover
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        charts_dir: Option<PathBuf>,
        #[arg(long)]
        cogs: Option<f64>,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the daily median series as date,value lines
    Series {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
    pub cogs: Option<f64>,
    pub threshold: Option<f64>,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub raw_rows: usize,
    pub cleaned: Table,
    pub outliers: Table,
    pub suspicious: Table,
    pub turnover: f64,
    pub series: Option<Vec<SeriesPoint>>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            input,
            output,
            charts_dir,
            cogs,
            threshold,
        } => run_analyze(
            &config,
            Overrides {
                input,
                output,
                charts_dir,
                cogs,
                threshold,
            },
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Series { config, input } => run_series(
            &config,
            Overrides {
                input,
                ..Overrides::default()
            },
        ),
    }
}

fn fail(err: AuditError) -> ExitCode {
    log::error!("{err}");
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(fail)
}

pub fn apply_overrides(
    mut config: AnalysisConfig,
    overrides: Overrides,
) -> Result<AnalysisConfig, AuditError> {
    if let Some(input) = overrides.input {
        config.input_path = input;
    }
    if let Some(output) = overrides.output {
        config.suspicious_path = output;
    }
    if let Some(dir) = overrides.charts_dir {
        config.charts_dir = Some(dir);
    }
    if let Some(cogs) = overrides.cogs {
        if !cogs.is_finite() {
            return Err(AuditError::ConfigInvalid {
                section: "analysis".into(),
                key: "cogs".into(),
                reason: "expected a finite number".into(),
            });
        }
        config.cogs = cogs;
    }
    if let Some(threshold) = overrides.threshold {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(AuditError::ConfigInvalid {
                section: "analysis".into(),
                key: "z_threshold".into(),
                reason: "z_threshold must be positive".into(),
            });
        }
        config.z_threshold = threshold;
    }
    Ok(config)
}

fn resolve_config(config_path: &Path, overrides: Overrides) -> Result<AnalysisConfig, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    build_analysis_config(&adapter)
        .and_then(|cfg| apply_overrides(cfg, overrides))
        .map_err(fail)
}

fn run_analyze(config_path: &Path, overrides: Overrides) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let source = CsvAdapter::new(config.input_path.clone()).with_delimiter(config.delimiter);
    let report = FileReportAdapter::new(config.charts_dir.clone());

    match run_analysis_pipeline(&source, &report, &config) {
        Ok(result) => {
            println!("Inventory Turnover Ratio: {}", result.turnover);
            eprintln!(
                "\nSuspicious transactions written to: {}",
                config.suspicious_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Daily median series for `series`, sourced either from seeded synthetic
/// observations or from the cleaned table.
pub fn build_series(
    series: &SeriesConfig,
    cleaned: &Table,
    date_column: &str,
) -> Result<Vec<SeriesPoint>, AuditError> {
    let observations = match series.source {
        SeriesSource::Synthetic => synthetic_observations(
            series.start_date,
            series.observed_end,
            series.seed,
            series.unit_cost_min,
            series.unit_cost_max,
        )?,
        SeriesSource::Table => observations_from_table(cleaned, date_column, &series.value_column)?
            .into_iter()
            .filter(|o| o.date <= series.observed_end)
            .collect(),
    };
    build_daily_series(&observations, series.start_date, series.end_date)
}

pub fn run_analysis_pipeline(
    source: &dyn TableSource,
    report: &dyn ReportPort,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AuditError> {
    // Stage 1: Load and clean
    let raw = source.load()?;
    let (cleaned, summary) =
        clean_table_summarized(&raw, &config.numeric_columns, Some(&config.date_column))?;
    eprintln!(
        "Cleaned {} of {} rows ({} dropped)",
        cleaned.row_count(),
        raw.row_count(),
        summary.dropped
    );
    if summary.unparsed_dates > 0 {
        log::warn!(
            "{} rows have an unparseable {}",
            summary.unparsed_dates,
            config.date_column
        );
    }

    // Stage 2: Console summary
    println!("=== First {} rows ===", config.preview_rows);
    print!("{}", format_preview(&cleaned, config.preview_rows));
    println!("\n=== Schema ===");
    print!("{}", format_schema(&cleaned));
    println!("\n=== Numeric summary ===");
    print!("{}", format_describe(&describe(&cleaned)));
    println!();

    // Stage 3: Outliers
    let outliers = detect_outliers(&cleaned, &config.outlier_column, config.z_threshold)?;
    eprintln!(
        "Outliers in {} (|z| > {}): {}",
        config.outlier_column,
        config.z_threshold,
        outliers.row_count()
    );

    // Stage 4: Suspicious rows
    let suspicious = identify_suspicious_with(&cleaned, &config.rule)?;
    eprintln!(
        "Suspicious transactions ({} > {}, {} = {}): {}",
        config.rule.amount_column,
        config.rule.min_amount,
        config.rule.category_column,
        config.rule.category,
        suspicious.row_count()
    );
    report.write_table(&suspicious, &config.suspicious_path)?;

    // Stage 5: Turnover
    let turnover = inventory_turnover(&cleaned, config.cogs)?;
    log::info!("inventory turnover {} (cogs {})", turnover, config.cogs);

    // Stage 6: Daily series
    let series = match &config.series {
        Some(series_config) => Some(build_series(series_config, &cleaned, &config.date_column)?),
        None => None,
    };

    // Stage 7: Charts
    render_charts(report, config, &cleaned, series.as_deref())?;

    Ok(AnalysisReport {
        raw_rows: raw.row_count(),
        cleaned,
        outliers,
        suspicious,
        turnover,
        series,
    })
}

fn render_charts(
    report: &dyn ReportPort,
    config: &AnalysisConfig,
    cleaned: &Table,
    series: Option<&[SeriesPoint]>,
) -> Result<(), AuditError> {
    if config.charts_dir.is_none() {
        return Ok(());
    }

    let column = &config.outlier_column;
    let idx = cleaned.column_index(column)?;
    let mask = outlier_mask(cleaned, column, config.z_threshold)?;
    let mut normal = Vec::new();
    let mut flagged = Vec::new();
    for (i, (row, is_outlier)) in cleaned.rows().iter().zip(&mask).enumerate() {
        if let Some(v) = row[idx].as_number() {
            if *is_outlier {
                flagged.push((i as f64, v));
            } else {
                normal.push((i as f64, v));
            }
        }
    }
    report.write_chart(
        "transactions_scatter",
        &svg_chart::scatter_svg(
            &format!("Normal vs outlier transactions ({column})"),
            "row",
            column,
            &normal,
            &flagged,
        ),
    )?;

    let dist = &config.distribution_column;
    let values = cleaned.numbers(dist)?;
    report.write_chart(
        "distribution_histogram",
        &svg_chart::histogram_svg(
            &format!("Distribution of {dist}"),
            dist,
            &histogram(&values, HISTOGRAM_BINS),
            &density_curve(&values, DENSITY_POINTS),
        ),
    )?;
    report.write_chart(
        "distribution_boxplot",
        &svg_chart::box_plot_svg(&format!("Box plot of {dist}"), dist, box_stats(&values).as_ref()),
    )?;

    report.write_chart(
        "correlation_heatmap",
        &svg_chart::heatmap_svg("Correlation heatmap", &correlation_matrix(cleaned)?),
    )?;

    if let (Some(points), Some(series_config)) = (series, &config.series) {
        let value_column = &series_config.value_column;
        report.write_chart(
            "daily_median_series",
            &svg_chart::line_svg(
                &format!("Median {value_column} per day"),
                value_column,
                points,
            ),
        )?;
    }
    Ok(())
}

/// `date,value` lines; missing days leave the value blank.
pub fn format_series(series: &[SeriesPoint]) -> String {
    let mut out = String::from("date,value\n");
    for point in series {
        match point.value {
            Some(v) => out.push_str(&format!("{},{}\n", point.date, v)),
            None => out.push_str(&format!("{},\n", point.date)),
        }
    }
    out
}

fn run_series(config_path: &Path, overrides: Overrides) -> ExitCode {
    let config = match resolve_config(config_path, overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let Some(series_config) = &config.series else {
        return fail(AuditError::ConfigMissing {
            section: "series".into(),
            key: "start_date".into(),
        });
    };

    let cleaned = match series_config.source {
        SeriesSource::Synthetic => Table::default(),
        SeriesSource::Table => {
            let source = CsvAdapter::new(config.input_path.clone()).with_delimiter(config.delimiter);
            match source
                .load()
                .and_then(|raw| clean_table(&raw, &config.numeric_columns, Some(&config.date_column)))
            {
                Ok(t) => t,
                Err(e) => return fail(e),
            }
        }
    };

    match build_series(series_config, &cleaned, &config.date_column) {
        Ok(series) => {
            print!("{}", format_series(&series));
            eprintln!(
                "{} days, {} missing",
                series.len(),
                series.iter().filter(|p| p.value.is_none()).count()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match resolve_config(config_path, Overrides::default()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    eprintln!("\nInput:");
    eprintln!("  path:            {}", config.input_path.display());
    eprintln!("  numeric columns: {}", config.numeric_columns.join(", "));
    eprintln!("  date column:     {}", config.date_column);
    eprintln!("\nAnalysis:");
    eprintln!("  outlier column:  {}", config.outlier_column);
    eprintln!("  z threshold:     {}", config.z_threshold);
    eprintln!("  cogs:            {}", config.cogs);
    eprintln!("\nRule:");
    eprintln!(
        "  {} > {} AND {} == {:?}",
        config.rule.amount_column,
        config.rule.min_amount,
        config.rule.category_column,
        config.rule.category
    );
    if let Some(series) = &config.series {
        eprintln!("\nSeries:");
        eprintln!(
            "  {} to {} (observed through {})",
            series.start_date, series.end_date, series.observed_end
        );
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
