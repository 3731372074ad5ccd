//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Persistence and clock abstractions
//! - `user_registry` - User collection and balance operations
//! - `transaction_log` - Newest-first transactions and the review state machine
//! - `spin` - Reward wheel draws and the in-flight guard
//! - `engine` - The ledger and its user-facing operations
//! - `admin` - Admin review workflow

pub mod admin;
pub mod engine;
pub mod spin;
pub mod traits;
pub mod transaction_log;
pub mod user_registry;

pub use admin::Dashboard;
pub use engine::{Landing, Ledger, Session};
pub use spin::{SpinTicket, SpinWheel};
pub use traits::{Clock, KeyValueStore, ManualClock, SystemClock};
pub use transaction_log::TransactionLog;
pub use user_registry::UserRegistry;
