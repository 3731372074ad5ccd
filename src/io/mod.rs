//! I/O module
//!
//! Handles persistence and report output.
//!
//! # Components
//!
//! - `store` - Key-value store implementations and collection (de)serialization
//! - `csv_format` - CSV export of users and transactions

pub mod csv_format;
pub mod store;

pub use csv_format::{write_transactions_csv, write_users_csv};
pub use store::{FileStore, MemoryStore, INVESTMENTS_KEY, TRANSACTIONS_KEY, USERS_KEY};
