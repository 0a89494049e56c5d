//! Asynchronous CSV reader with batch interface
//!
//! Provides batches of command records from an async CSV source.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of CommandRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```
//!
//! Sequence numbers carry over between batches, and rows that fail to
//! parse still consume one, so they line up with the sync reader's.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::CommandRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    rows_read: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            rows_read: 0,
        }
    }

    /// Read a batch of command records
    ///
    /// Reads rows until `batch_size` valid records are collected or the
    /// input ends. Invalid rows are logged at warn level and skipped.
    ///
    /// # Returns
    ///
    /// The converted records, or an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<CommandRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.rows_read += 1;
            let seq = self.rows_read;

            match row.map_err(|e| format!("CSV parse error: {}", e)) {
                Ok(csv_record) => match convert_csv_record(csv_record, seq) {
                    Ok(record) => batch.push(record),
                    Err(error) => tracing::warn!(line = seq + 1, %error, "skipping row"),
                },
                Err(error) => tracing::warn!(line = seq + 1, %error, "skipping row"),
            }
        }

        batch
    }
}
