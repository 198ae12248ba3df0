use crate::error::{ReportError, Result};
use crate::interfaces::csv::record_reader::RecordReader;
use crate::interfaces::spreadsheet;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(ReportError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Checks that `path` exists and has a readable format, without reading it.
pub fn probe(path: &Path) -> Result<TableFormat> {
    if !path.is_file() {
        return Err(ReportError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    TableFormat::from_path(path)
}

/// Loads every record of a table file into `T`, failing on the first bad row.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let records: Result<Vec<T>> = match probe(path)? {
        TableFormat::Csv => File::open(path)
            .map_err(ReportError::from)
            .and_then(|file| RecordReader::new(file).records().collect()),
        TableFormat::Tsv => File::open(path)
            .map_err(ReportError::from)
            .and_then(|file| RecordReader::tab_separated(file).records().collect()),
        TableFormat::Spreadsheet => spreadsheet::read_records(path),
    };
    let records = records.map_err(|e| e.in_file(path))?;
    log::debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}
