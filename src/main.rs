//! Investment Ledger CLI
//!
//! Command-line front end to the ledger. Collections are kept as JSON files in
//! the data directory and every command persists its changes before exiting.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- register --phone 9811111111 --password secret
//! cargo run -- deposit --phone 9811111111 --password secret --amount 1000 --screenshot receipt.png
//! cargo run -- approve --phone 9800000000 --password admin <TX_ID>
//! cargo run -- invest --phone 9811111111 --password secret --plan v1
//! cargo run -- --data-dir ./data --config ledger.toml dashboard --phone 9800000000 --password admin
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `warn`); logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad credentials, rule violation, unreadable data, etc.)

use invest_ledger::cli;
use invest_ledger::{FileStore, Ledger, LedgerConfig, LedgerError};
use std::process;
use tracing_subscriber::EnvFilter;

async fn run(args: cli::CliArgs) -> Result<(), LedgerError> {
    let config = match &args.config {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::default(),
    };
    let store = FileStore::open(&args.data_dir)?;
    let mut ledger = Ledger::open(store, config)?;

    let mut output = std::io::stdout();
    cli::execute(&mut ledger, args.command, &mut output).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
