//! Benchmark suite for the ledger engine and the processing strategies
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Strategy benchmarks run against generated CSV inputs of increasing size.
//! Each input opens 100 accounts across 10 players followed by a mix of
//! credits, debits and reads, including some foreign-account attempts.

use divan::Bencher;
use player_ledger::cli::StrategyType;
use player_ledger::core::{EngineConfig, LedgerEngine, MemoryStore};
use player_ledger::strategy::{create_strategy, BatchConfig};
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

const ACCOUNTS: usize = 100;

fn generate_input(commands: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "type,player,account,amount").expect("Failed to write header");
    for account in 0..ACCOUNTS {
        writeln!(file, "open,player{},acct{},", account % 10, account)
            .expect("Failed to write row");
    }
    for step in 0..commands {
        let account = step % ACCOUNTS;
        let player = if step % 17 == 0 { 10 } else { account % 10 };
        let row = match step % 5 {
            0 | 1 => format!("credit,player{},acct{},{}.25", player, account, step % 50 + 1),
            2 | 3 => format!("debit,player{},acct{},{}.10", player, account, step % 20 + 1),
            _ => format!("balance,player{},acct{},", player, account),
        };
        writeln!(file, "{}", row).expect("Failed to write row");
    }
    file.flush().expect("Failed to flush temp file");
    file
}

/// Synchronous strategy over generated inputs
#[divan::bench(args = [1_000, 100_000])]
fn sync_strategy(bencher: Bencher, commands: usize) {
    let input = generate_input(commands);
    let strategy = create_strategy(StrategyType::Sync, None, EngineConfig::default());

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed")
    });
}

/// Asynchronous strategy over generated inputs
#[divan::bench(args = [1_000, 100_000])]
fn async_strategy(bencher: Bencher, commands: usize) {
    let input = generate_input(commands);
    let strategy = create_strategy(
        StrategyType::Async,
        Some(BatchConfig::default()),
        EngineConfig::default(),
    );

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(input.path(), &mut output)
            .expect("Processing failed")
    });
}

/// Credit followed by debit on one account, single-threaded
#[divan::bench]
fn engine_credit_debit(bencher: Bencher) {
    let engine = LedgerEngine::new(Arc::new(MemoryStore::new()));
    let account = engine.open_account(1).expect("Failed to open account");
    let amount = Decimal::new(1025, 2);

    bencher.bench_local(|| {
        engine
            .credit(account.account_id, 1, amount)
            .expect("Credit failed");
        engine
            .debit(account.account_id, 1, amount)
            .expect("Debit failed")
    });
}

/// Credits from all bench threads contending on one account
#[divan::bench(threads)]
fn engine_contended_credit(bencher: Bencher) {
    static ENGINE: std::sync::OnceLock<(LedgerEngine<MemoryStore>, u64)> =
        std::sync::OnceLock::new();
    let (engine, account_id) = ENGINE.get_or_init(|| {
        let engine = LedgerEngine::with_config(
            Arc::new(MemoryStore::new()),
            EngineConfig::new(u32::MAX),
        );
        let account = engine.open_account(1).expect("Failed to open account");
        (engine, account.account_id)
    });

    bencher.bench(|| {
        engine
            .credit(*account_id, 1, Decimal::ONE)
            .expect("Credit failed")
    });
}
