//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates command processing by coordinating
//! between the SyncReader (for CSV input) and the CommandProcessor (for the
//! ledger and its audit trail).
//!
//! # Memory Efficiency
//!
//! Commands are streamed one at a time; the input file is never loaded
//! into memory as a whole.

use crate::core::{AuditAction, EngineConfig};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{finish, new_processor, ProcessingStrategy};
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use player_ledger::core::EngineConfig;
/// use player_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(EngineConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    engine_config: EngineConfig,
}

impl SyncProcessingStrategy {
    pub fn new(engine_config: EngineConfig) -> Self {
        Self { engine_config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process commands from input file and write results to output
    ///
    /// 1. Creates a SyncReader to stream command records from the CSV file
    /// 2. Creates a CommandProcessor over a fresh in-memory ledger
    /// 3. Processes each record in input order
    /// 4. Writes the account summaries and returns the audit trail
    ///
    /// Rows that fail to parse are logged and skipped. Rejected commands are
    /// logged and audited by the processor.
    fn process(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Vec<AuditAction>, String> {
        let processor = new_processor(&self.engine_config);
        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(record) => {
                    // Failures are already audited and logged
                    let _ = processor.process(&record);
                }
                Err(error) => tracing::warn!(%error, "skipping row"),
            }
        }

        finish(&processor, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AuditOutcome;
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
    fn test_sync_strategy_processes_lifecycle() {
        let csv_content = "type,player,account,amount\n\
                          open,alice,main,\n\
                          credit,alice,main,50.00\n\
                          debit,alice,main,20.00\n";
        let file = create_temp_csv(csv_content);
        let mut output = Vec::new();

        let audit = SyncProcessingStrategy::default()
            .process(file.path(), &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,player,balance,operations\nmain,alice,30.00,2\n"
        );
        assert_eq!(audit.len(), 3);
        assert!(audit.iter().all(|entry| entry.outcome == AuditOutcome::Success));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut output = Vec::new();

        let result =
            SyncProcessingStrategy::default().process(Path::new("nonexistent.csv"), &mut output);

        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_continues_after_rejections() {
        let csv_content = "type,player,account,amount\n\
                          open,alice,main,\n\
                          transfer,alice,main,5\n\
                          debit,alice,main,5\n\
                          credit,alice,main,7\n";
        let file = create_temp_csv(csv_content);
        let mut output = Vec::new();

        let audit = SyncProcessingStrategy::default()
            .process(file.path(), &mut output)
            .unwrap();

        let seqs: Vec<u64> = audit.iter().map(|entry| entry.seq).collect();
        assert_eq!(seqs, vec![1, 3, 4]);
        assert_eq!(audit[1].outcome, AuditOutcome::Failure("insufficient_funds"));
        assert!(String::from_utf8(output).unwrap().contains("main,alice,7,1"));
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
