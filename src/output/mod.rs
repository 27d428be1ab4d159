//! Output module
//!
//! The crawl's single output is an append-only delimiter-separated file of
//! listing records; this module owns that sink.

mod csv_sink;

pub use csv_sink::CsvSink;
