use crate::error::Result;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Renders one cell the way a CSV export of the sheet would show it.
///
/// Whole floats lose their fractional part so that phone numbers and ids
/// stored as numbers join against their CSV counterparts.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => serial_to_text(dt.as_f64()),
    }
}

/// Converts a 1900-system spreadsheet serial date to `YYYY-MM-DD HH:MM:SS`.
fn serial_to_text(serial: f64) -> String {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0));
    let millis = (serial * 86_400_000.0).round() as i64;
    match epoch.and_then(|epoch| epoch.checked_add_signed(Duration::milliseconds(millis))) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => serial.to_string(),
    }
}

/// Reads the first worksheet as header + records.
pub fn read_first_sheet(path: &Path) -> Result<Option<(csv::StringRecord, Vec<csv::StringRecord>)>> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        log::warn!("{} contains no worksheets", path.display());
        return Ok(None);
    };
    let range = range?;

    let mut rows = range.rows().map(|row| {
        let mut record: csv::StringRecord = row.iter().map(cell_text).collect();
        record.trim();
        record
    });
    let Some(header) = rows.next() else {
        return Ok(None);
    };
    let records = rows
        .filter(|record| record.iter().any(|field| !field.is_empty()))
        .collect();
    Ok(Some((header, records)))
}

/// Deserializes every data row of the first worksheet into `T`.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let Some((header, records)) = read_first_sheet(path)? else {
        return Ok(Vec::new());
    };
    records
        .iter()
        .map(|record| Ok(record.deserialize(Some(&header))?))
        .collect()
}
