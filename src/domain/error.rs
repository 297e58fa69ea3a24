//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for txaudit.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read input {path}: {reason}")]
    InputRead { path: String, reason: String },

    #[error("malformed input at record {record}: {reason}")]
    InputMalformed { record: usize, reason: String },

    #[error("missing column: {column}")]
    MissingColumn { column: String },

    #[error("average inventory of column {column} is zero or undefined; turnover cannot be computed")]
    ZeroAverageInventory { column: String },

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AuditError> for std::process::ExitCode {
    fn from(err: &AuditError) -> Self {
        let code: u8 = match err {
            AuditError::Io(_) => 1,
            AuditError::ConfigParse { .. }
            | AuditError::ConfigMissing { .. }
            | AuditError::ConfigInvalid { .. } => 2,
            AuditError::InputRead { .. }
            | AuditError::InputMalformed { .. }
            | AuditError::Csv(_) => 3,
            AuditError::MissingColumn { .. } => 4,
            AuditError::ZeroAverageInventory { .. } | AuditError::InvalidDateRange { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
