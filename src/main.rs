//! Player Ledger CLI
//!
//! Replays player account commands from a CSV file against the ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- --strategy sync commands.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > accounts.csv
//! cargo run -- --max-attempts 5 --audit-log audit.csv commands.csv > accounts.csv
//! RUST_LOG=debug cargo run -- commands.csv > accounts.csv
//! ```
//!
//! The final account summaries go to stdout, diagnostics to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, output not writable, etc.)

use player_ledger::cli;
use player_ledger::core::AuditAction;
use player_ledger::io::write_audit_csv;
use player_ledger::logging;
use player_ledger::strategy;
use std::fs::File;
use std::path::Path;
use std::process;

fn main() {
    logging::init();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config, args.to_engine_config())
    };

    let mut output = std::io::stdout();
    let audit = match strategy.process(&args.input_file, &mut output) {
        Ok(audit) => audit,
        Err(e) => {
            tracing::error!(error = %e, input = %args.input_file.display(), "processing failed");
            process::exit(1);
        }
    };

    if let Some(path) = &args.audit_log {
        if let Err(e) = write_audit_file(path, &audit) {
            tracing::error!(error = %e, path = %path.display(), "failed to write audit log");
            process::exit(1);
        }
    }
}

fn write_audit_file(path: &Path, audit: &[AuditAction]) -> Result<(), String> {
    let mut file = File::create(path)
        .map_err(|e| format!("Failed to create audit log '{}': {}", path.display(), e))?;
    write_audit_csv(audit, &mut file)
}
