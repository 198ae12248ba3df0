use crate::error::{ReportError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads typed records from a delimited text source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<T>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RecordReader<R> {
    /// Creates a comma-separated `RecordReader` from any `Read` source.
    pub fn new(source: R) -> Self {
        Self::with_delimiter(source, b',')
    }

    /// Creates a tab-separated `RecordReader`.
    pub fn tab_separated(source: R) -> Self {
        Self::with_delimiter(source, b'\t')
    }

    fn with_delimiter(source: R, delimiter: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes records.
    pub fn records<T: DeserializeOwned>(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ReportError::from))
    }
}
