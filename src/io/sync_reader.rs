//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over command records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to read and deserialize CSV records
//! sequentially. Every data row consumes one sequence number, valid or
//! not, so `seq` always matches the row's position in the input.
//!
//! ```no_run
//! use player_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Processing command: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::CommandRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Provides an iterator interface over command records.
/// Maintains streaming behavior with constant memory usage.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    rows_read: u64,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (for the optional amount field)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            rows_read: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<CommandRecord, String>;

    /// Get the next command record from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(CommandRecord))` - Successfully parsed record
    /// * `Some(Err(String))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;

        self.rows_read += 1;
        let seq = self.rows_read;
        // +1 for the header line
        let line = seq + 1;

        match row {
            Ok(csv_record) => Some(
                convert_csv_record(csv_record, seq).map_err(|e| format!("Line {}: {}", line, e)),
            ),
            Err(e) => Some(Err(format!("Line {}: CSV parse error: {}", line, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));

        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_iterates_commands() {
        let csv_content = "type,player,account,amount\n\
            open,alice,main,\n\
            credit,alice,main,100.0\n\
            history,alice,main,\n";
        let file = create_temp_csv(csv_content);

        let records: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].command, CommandType::Open);
        assert_eq!(records[1].command, CommandType::Credit);
        assert_eq!(records[1].amount.as_deref(), Some("100.0"));
        assert_eq!(records[2].command, CommandType::History);
    }

    #[test]
    fn test_sync_reader_handles_missing_amount_column() {
        let csv_content = "type,player,account,amount\nopen,alice,main\nbalance,alice,main\n";
        let file = create_temp_csv(csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(Result::is_ok));
    }

    #[test]
    fn test_sync_reader_seq_counts_invalid_rows() {
        let csv_content = "type,player,account,amount\n\
            open,alice,main,\n\
            transfer,alice,main,5\n\
            credit,alice,main,5\n";
        let file = create_temp_csv(csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().seq, 1);
        assert!(records[1].as_ref().unwrap_err().contains("Line 3"));
        assert_eq!(records[2].as_ref().unwrap().seq, 3);
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let csv_content = "type,player,account,amount\n  credit  ,  alice  ,  main  ,  1.5  \n";
        let file = create_temp_csv(csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.player, "alice");
        assert_eq!(record.account, "main");
        assert_eq!(record.amount.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("type,player,account,amount\n");

        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }
}
