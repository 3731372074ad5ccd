//! Investment Ledger Library
//! # Overview
//!
//! This library implements the ledger behind a pseudo-investment platform:
//! user wallets, admin-reviewed deposits and withdrawals, a fixed catalog of
//! investment plans, daily check-in bonuses, a reward wheel and referral spin
//! credits.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (User, Transaction, UserInvestment, errors)
//! - [`config`] - Business constants with TOML overrides
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - The [`Ledger`] and its user-facing operations
//!   - [`core::admin`] - Review of pending deposits and withdrawals
//!   - [`core::user_registry`] - User lookup and balance operations
//!   - [`core::transaction_log`] - Newest-first history and the review state machine
//!   - [`core::spin`] - Reward wheel draws
//! - [`io`] - Key-value persistence and CSV export
//! - [`cli`] - Command-line front end
//!
//! # Transaction Lifecycle
//!
//! - **Deposit** and **Withdraw** are created `pending` and move once to
//!   `approved` or `rejected` by an admin
//! - **CheckIn** and **Spin** are created `approved`
//!
//! A deposit credits the balance only on approval. A withdrawal debits the
//! gross amount when it is submitted and records the net amount after fees.
//!
//! # Example
//!
//! ```
//! use invest_ledger::{Ledger, LedgerConfig, MemoryStore, Registration};
//! use rust_decimal::Decimal;
//!
//! let mut ledger = Ledger::open(MemoryStore::new(), LedgerConfig::default()).unwrap();
//! let user = ledger.register(Registration::new("9811111111", "secret")).unwrap();
//! assert_eq!(user.balance, Decimal::from(100));
//!
//! let tx = ledger.deposit(&user.id, Decimal::from(1000), "receipt.png").unwrap();
//! assert!(tx.status.is_pending());
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod types;

pub use config::LedgerConfig;
pub use core::{Clock, Dashboard, KeyValueStore, Landing, Ledger, ManualClock, SystemClock};
pub use io::{write_transactions_csv, write_users_csv, FileStore, MemoryStore};
pub use types::{
    BankDetails, InvestmentPlan, LedgerError, Registration, Transaction, TransactionKind,
    TransactionStatus, User, UserInvestment, WithdrawalDraft, WithdrawalRequest,
};
