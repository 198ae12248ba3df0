use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("input file not found: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("unsupported input format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("malformed record in {table} at row {row}: missing or invalid '{field}'")]
    MalformedRecord {
        table: String,
        row: usize,
        field: &'static str,
    },
    #[error("join produced no rows at stage '{stage}'")]
    JoinEmptyResult { stage: &'static str },
    #[error("failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        source: Box<ReportError>,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),
}

impl ReportError {
    /// Attaches the offending input path to errors that do not already carry one.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::MissingFile { .. } | Self::UnsupportedFormat { .. } | Self::Input { .. } => self,
            other => Self::Input {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
