//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It processes commands in batches using tokio
//! tasks with account-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (account partitioning + tokio tasks)
//!         └── CommandProcessor (directory, labels, audit)
//!             └── LedgerEngine<MemoryStore>
//! ```
//!
//! # Ordering
//!
//! - Batches run one after another, so a label's commands keep their order
//!   across batch boundaries
//! - Within a batch, each label's commands run in order on one task
//! - Different labels run in parallel on the multi-threaded runtime
//!
//! The final output therefore matches the synchronous strategy's.

use crate::core::{AuditAction, BatchProcessor, EngineConfig};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{finish, new_processor, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how commands are batched and the number of worker threads
/// for parallel processing within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, falling back to defaults for zero values
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Commands are read in batches and processed batch by batch. Within each
/// batch, commands are partitioned by account label and the partitions run
/// in parallel across the runtime's worker threads.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    engine_config: EngineConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - BatchConfig with batch_size and max_concurrent_batches
    /// * `engine_config` - Ledger engine configuration
    pub fn new(config: BatchConfig, engine_config: EngineConfig) -> Self {
        Self {
            config,
            engine_config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process commands from input file and write results to output
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Creates a CommandProcessor over a fresh in-memory ledger
    /// 3. Reads commands in batches from CSV using AsyncReader
    /// 4. Processes each batch to completion before reading the next
    /// 5. Writes the account summaries and returns the audit trail
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, I/O errors, runtime errors) are returned
    /// immediately. Rejected commands are audited and processing continues.
    fn process(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<Vec<AuditAction>, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let processor = Arc::new(new_processor(&self.engine_config));
            let batches = BatchProcessor::new(Arc::clone(&processor));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads futures::io, not tokio::io
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                let size = batch.len();
                let results = batches.process_batch(batch).await;
                let failed = results.iter().filter(|r| r.result.is_err()).count();
                tracing::debug!(size, failed, "batch processed");
            }

            finish(&processor, output)
        })
    }
}
