//! Append-only CSV sink
//!
//! Writes listing records to a delimiter-separated file. The header row
//! (the selected field identifiers in configured order) is written exactly
//! once, before the first batch; every later write opens the file in
//! append mode. Batches land whole, so any halt leaves the file valid:
//! never truncated mid-row, never missing its header once a row exists.

use crate::crawler::ListingRecord;
use crate::HarvestError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Append-only structured record writer.
pub struct CsvSink {
    path: PathBuf,
    delimiter: u8,
    header: Vec<String>,
    header_written: bool,
}

impl CsvSink {
    /// Creates a sink for the given path and field selection.
    ///
    /// Nothing touches the filesystem until the first non-empty batch
    /// arrives; a run that collects no records leaves no file behind.
    pub fn new(path: impl AsRef<Path>, delimiter: u8, header: Vec<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
            header,
            header_written: false,
        }
    }

    /// Appends one batch of records, writing the header first if this is
    /// the first batch of the run
    ///
    /// # Returns
    ///
    /// The number of records written.
    pub fn append_batch(&mut self, records: &[ListingRecord]) -> Result<usize, HarvestError> {
        if records.is_empty() {
            return Ok(0);
        }

        tracing::info!(count = records.len(), path = %self.path.display(), "Saving batch");

        if !self.header_written {
            let file = File::create(&self.path)?;
            let mut writer = csv::WriterBuilder::new()
                .delimiter(self.delimiter)
                .from_writer(file);
            writer.write_record(&self.header)?;
            writer.flush()?;
            self.header_written = true;
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(file);

        for record in records {
            writer.write_record(record.values().iter().map(|v| v.as_str()))?;
        }
        writer.flush()?;

        Ok(records.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
