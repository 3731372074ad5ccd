//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `user`: User identity and wallet
//! - `transaction`: Transaction records, kinds and review status
//! - `investment`: Plan catalog entries and purchased investments
//! - `command`: Typed command objects built by the presentation boundary
//! - `error`: Error types for the ledger

pub mod command;
pub mod error;
pub mod investment;
pub mod transaction;
pub mod user;

pub use command::{Registration, WithdrawalDraft, WithdrawalRequest};
pub use error::LedgerError;
pub use investment::{InvestmentId, InvestmentPlan, InvestmentStatus, PlanId, UserInvestment};
pub use transaction::{
    BankDetails, Transaction, TransactionId, TransactionKind, TransactionStatus,
};
pub use user::{User, UserId};
