//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! commands concurrently while keeping per-account command order.
//!
//! # Design
//!
//! Commands are partitioned by account label. Every command that can touch
//! an account (including the `open` that binds its label) lands in that
//! label's partition, and each partition runs sequentially on its own tokio
//! task. Commands on different accounts run in parallel; the engine's
//! per-account commit keeps each account consistent either way.
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be shared across async tasks. The
//! command processor behind it is shared through an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use super::processor::{CommandOutcome, CommandProcessor};
use super::traits::LedgerStore;
use crate::types::{CommandError, CommandRecord};

/// Result of processing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub record: CommandRecord,

    /// The result of processing (success or error)
    pub result: Result<CommandOutcome, CommandError>,
}

/// Batch processor with account-based partitioning
#[derive(Debug)]
pub struct BatchProcessor<S> {
    processor: Arc<CommandProcessor<S>>,
}

impl<S> Clone for BatchProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
        }
    }
}

impl<S: LedgerStore + 'static> BatchProcessor<S> {
    /// Create a new BatchProcessor sharing `processor`
    pub fn new(processor: Arc<CommandProcessor<S>>) -> Self {
        Self { processor }
    }

    /// Partition a batch of commands by account label
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one partition
    /// - Commands in a partition keep their original order
    /// - A partition only holds commands for a single label
    pub fn partition_by_account(
        &self,
        batch: Vec<CommandRecord>,
    ) -> HashMap<String, Vec<CommandRecord>> {
        let mut partitions: HashMap<String, Vec<CommandRecord>> = HashMap::new();

        for record in batch {
            partitions
                .entry(record.account.clone())
                .or_default()
                .push(record);
        }

        partitions
    }

    /// Process one account's commands sequentially, in order
    ///
    /// Every command is processed even if earlier ones fail.
    pub async fn process_account_commands(
        &self,
        commands: Vec<CommandRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(commands.len());

        for record in commands {
            let result = self.processor.process(&record);
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Process a batch of commands with account-based partitioning
    ///
    /// 1. Partition the batch by account label
    /// 2. Spawn a tokio task per partition
    /// 3. Wait for every task and collect the results
    ///
    /// Results are grouped by partition, not in input order. Spawned tasks
    /// run to completion even if the returned future is dropped.
    pub async fn process_batch(&self, batch: Vec<CommandRecord>) -> Vec<ProcessingResult> {
        let partitions = self.partition_by_account(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for (_label, commands) in partitions {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_account_commands(commands).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(partition_results) => results.extend(partition_results),
                Err(e) => tracing::error!(error = %e, "partition task failed"),
            }
        }

        results
    }
}
