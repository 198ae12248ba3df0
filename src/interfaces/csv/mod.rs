pub mod record_reader;
pub mod report_writer;
