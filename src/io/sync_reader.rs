//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over command records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - A file that cannot be opened is reported by `new()`
//! - A read failure mid-file is yielded as `PointError::Io`; callers stop there
//! - Individual record errors are yielded as `Err` items tagged with their line
//!   number, so the caller can skip them and keep reading
//!
//! ```no_run
//! use point_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Command: {:?}", command),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{PointCommand, PointError, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one record at a time, so memory use does not grow with file size.
#[derive(Debug)]
pub struct SyncReader<R = File> {
    reader: csv::Reader<R>,
    line_num: u64,
}

impl SyncReader<File> {
    /// Open a command file for streaming iteration
    ///
    /// # Errors
    ///
    /// Returns `PointError::Io` if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PointError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> SyncReader<R> {
    /// Read commands from any byte source
    ///
    /// The reader trims whitespace from all fields and accepts rows with a
    /// missing trailing amount column.
    pub fn from_reader(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(source);

        Self {
            reader,
            line_num: 1,
        }
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<PointCommand>;

    /// Yields `PointError::Parse` for a bad row and `PointError::Io` when the
    /// underlying source fails; only the latter is fatal.
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let next = deserializer.next()?;
        self.line_num += 1;

        Some(match next {
            Ok(csv_record) => convert_csv_record(csv_record, Some(self.line_num)),
            Err(e) if e.is_io_error() => Err(PointError::Io {
                message: format!("Failed to read line {}: {}", self.line_num, e),
            }),
            Err(e) => Err(PointError::parse(Some(self.line_num), e.to_string())),
        })
    }
}
