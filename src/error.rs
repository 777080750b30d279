//! Error types.
//!
//! - `SalesError` is the typed error returned by library code (ingest,
//!   pipeline, export).
//! - `AppError` is the binary-facing error: a message plus a process exit code.

use std::path::PathBuf;

use chrono::NaiveDate;

/// Typed failures of the ingest/filter/export pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("Invalid date range: start {start} is after end {end}.")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(
        "No data source: pass `--file <path>` or set SALES_DEFAULT_SOURCE (environment or .env)."
    )]
    NoDataSource,

    #[error("Missing required column: `{column}`")]
    UnknownColumn { column: String },

    #[error("Column `{column}` appears more than once in the header")]
    DuplicateColumn { column: String },

    #[error("Line {line}: invalid `{column}` value '{value}'")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SalesError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SalesError::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code used when this error reaches `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            SalesError::InvalidRange { .. }
            | SalesError::NoDataSource
            | SalesError::UnknownColumn { .. }
            | SalesError::DuplicateColumn { .. }
            | SalesError::InvalidValue { .. }
            | SalesError::InvalidArgument(_)
            | SalesError::Csv(_) => 2,
            SalesError::Io { .. } | SalesError::Json(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SalesError> for AppError {
    fn from(err: SalesError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
