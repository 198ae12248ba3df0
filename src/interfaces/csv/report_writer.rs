use crate::domain::report::{REPORT_COLUMNS, ReconciledRow};
use crate::error::Result;
use std::io::Write;

/// Writes the combined report as CSV.
///
/// The header is always written, so an empty report still carries its columns.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
        Self { writer }
    }

    pub fn write_rows(&mut self, rows: &[ReconciledRow]) -> Result<()> {
        self.writer.write_record(REPORT_COLUMNS)?;
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
