use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests meter exports, loads lookup tables, or emits reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a delimited text file cannot be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a configured column pattern does not compile.
    #[error("invalid column pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Raised when the export has no readable column header row.
    #[error("meter export has {found} line(s); the column header is expected on line {expected}")]
    MissingHeaderRow { expected: usize, found: usize },

    /// Raised when no unit or common-area column survives classification.
    #[error("no unit or common-area columns found in the meter export")]
    NoDataColumnsFound,

    /// Raised when the old/new numbering table cannot be loaded.
    #[error("failed to load numbering table {path}: {reason}")]
    MappingLoadFailed { path: PathBuf, reason: String },

    /// Raised when the display-order file cannot be loaded.
    #[error("failed to load display order {path}: {reason}")]
    DisplayOrderLoadFailed { path: PathBuf, reason: String },

    /// Raised when the prior meter-reading workbook cannot be loaded.
    #[error("failed to load meter readings {path}: {reason}")]
    ReadingTableLoadFailed { path: PathBuf, reason: String },

    /// Raised when one of the report artifacts could not be written.
    #[error("failed to write {artifact}: {source}")]
    OutputWriteFailed {
        artifact: PathBuf,
        #[source]
        source: Box<ReportError>,
    },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ReportError {
    /// Wraps an error raised while producing the artifact at `path`.
    pub fn output(path: impl Into<PathBuf>, source: ReportError) -> Self {
        ReportError::OutputWriteFailed {
            artifact: path.into(),
            source: Box::new(source),
        }
    }
}
