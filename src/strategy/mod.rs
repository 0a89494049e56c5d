//! Processing strategy module for command processing
//!
//! This module defines the Strategy pattern for complete command processing
//! pipelines, encompassing CSV parsing, ledger processing and output. This
//! allows different processing implementations (synchronous, asynchronous
//! batch) to be selected at runtime.

use crate::cli::StrategyType;
use crate::core::{AuditAction, CommandProcessor, EngineConfig, LedgerEngine, MemoryStore};
use crate::io::csv_format::write_accounts_csv;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete command processing pipelines
///
/// Each strategy must be able to read commands from a CSV file, run them
/// through a ledger, and write the final account summaries to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from input file and write account summaries to output
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file containing command records
    /// * `output` - Mutable reference to a writer for outputting account summaries
    ///
    /// # Returns
    ///
    /// * `Ok(entries)` - The audit trail of every processed command, in `seq` order
    /// * `Err(String)` if a fatal error occurred (file not found, I/O error, etc.)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The async runtime cannot be created
    /// - Output cannot be written
    ///
    /// Rejected commands are audited and logged but never abort processing.
    fn process(&self, input_path: &Path, output: &mut dyn Write)
        -> Result<Vec<AuditAction>, String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
/// * `engine_config` - Ledger engine configuration shared by both strategies
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    engine_config: EngineConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(engine_config)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, engine_config))
        }
    }
}

/// A command processor over a fresh in-memory ledger
fn new_processor(engine_config: &EngineConfig) -> CommandProcessor<MemoryStore> {
    let engine = LedgerEngine::with_config(Arc::new(MemoryStore::new()), engine_config.clone());
    CommandProcessor::new(engine)
}

/// Write the final account summaries and hand back the audit trail
fn finish(
    processor: &CommandProcessor<MemoryStore>,
    output: &mut dyn Write,
) -> Result<Vec<AuditAction>, String> {
    let summaries = processor
        .summaries()
        .map_err(|e| format!("Failed to collect accounts: {}", e))?;
    write_accounts_csv(&summaries, output)?;

    let audit = processor.audit().entries();
    tracing::info!(
        accounts = summaries.len(),
        commands = audit.len(),
        "processing finished"
    );
    Ok(audit)
}
