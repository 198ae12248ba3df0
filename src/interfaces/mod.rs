//! Tabular input and output: CSV and spreadsheet readers, the report writer,
//! and format detection by file extension.

pub mod csv;
pub mod spreadsheet;
pub mod table;
