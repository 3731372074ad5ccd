//! Error types for the investment ledger
//!
//! This module defines every error a ledger operation can report. All of them
//! are user-facing: a failed operation leaves the collections untouched and the
//! caller may retry with corrected input.
//!
//! # Error Categories
//!
//! - **Input Errors**: malformed phone number, missing screenshot, incomplete bank details
//! - **Rule Errors**: insufficient balance, below minimum withdrawal, bonus already claimed, etc.
//! - **Lookup Errors**: unknown user, transaction or plan
//! - **Storage Errors**: persistence and (de)serialization failures

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use super::transaction::TransactionStatus;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Malformed input (wrong phone length, non-positive amount, ...)
    #[error("Invalid input: {message}")]
    Validation {
        /// Description of what was wrong
        message: String,
    },

    /// The canonical phone number is already registered
    #[error("Phone number {phone} is already registered")]
    DuplicatePhone {
        /// Canonical phone number
        phone: String,
    },

    /// No user matches the supplied phone and password.
    ///
    /// Deliberately does not say which of the two was wrong.
    #[error("Login rejected: phone number or password did not match")]
    AuthFailed,

    /// The daily check-in bonus was already taken today
    #[error("Daily bonus already claimed on {date}")]
    AlreadyClaimed {
        /// Calendar day of the previous claim
        date: NaiveDate,
    },

    /// Balance does not cover the requested debit
    #[error("Insufficient balance for user {user}: available {available}, requested {requested}")]
    InsufficientBalance {
        /// User ID
        user: String,
        /// Current balance
        available: Decimal,
        /// Amount the operation needed
        requested: Decimal,
    },

    /// Withdrawal below the configured minimum
    #[error("Minimum withdrawal is {minimum}, requested {requested}")]
    BelowMinimum {
        /// Configured minimum
        minimum: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// One or more bank fields of a withdrawal are empty
    #[error("Bank details are incomplete: bank name, account holder and account number are required")]
    IncompleteDetails,

    /// Withdrawals require at least one purchased plan
    #[error("Withdrawal blocked for user {user}: no active investment")]
    WithdrawalBlocked {
        /// User ID
        user: String,
    },

    /// Deposit submitted without a payment screenshot
    #[error("Deposit requires a payment screenshot")]
    MissingScreenshot,

    /// No spin credits left
    #[error("User {user} has no spin credits")]
    NoSpinCredits {
        /// User ID
        user: String,
    },

    /// A spin is already running for this user
    #[error("A spin is already in progress for user {user}")]
    SpinInFlight {
        /// User ID
        user: String,
    },

    /// Settling a spin that was never started (or already settled)
    #[error("No spin in progress for user {user}")]
    SpinNotInFlight {
        /// User ID
        user: String,
    },

    /// Admin-only action attempted by a regular user
    #[error("User {user} is not an administrator")]
    NotAdmin {
        /// User ID
        user: String,
    },

    /// Unknown user ID
    #[error("User {id} not found")]
    UserNotFound {
        /// User ID that was not found
        id: String,
    },

    /// Unknown transaction ID
    #[error("Transaction {id} not found for {operation}")]
    TransactionNotFound {
        /// Transaction ID that was not found
        id: String,
        /// Operation that failed
        operation: String,
    },

    /// Review action on a transaction that has already been resolved
    #[error("Transaction {id} is already {status}, cannot {operation}")]
    TransactionNotPending {
        /// Transaction ID
        id: String,
        /// Its current (terminal) status
        status: TransactionStatus,
        /// Operation that was refused
        operation: String,
    },

    /// Unknown investment plan ID
    #[error("Investment plan {id} not found")]
    PlanNotFound {
        /// Plan ID
        id: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for user {user}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// User ID
        user: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Reading or writing the persistent store failed
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the I/O failure
        message: String,
    },

    /// A persisted collection or export could not be (de)serialized
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Storage {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::Serialization {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::Serialization {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(error: toml::de::Error) -> Self {
        LedgerError::Config {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation {
            message: message.into(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user: &str, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            user: user.to_string(),
            available,
            requested,
        }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(id: &str) -> Self {
        LedgerError::UserNotFound { id: id.to_string() }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(id: &str, operation: &str) -> Self {
        LedgerError::TransactionNotFound {
            id: id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create a TransactionNotPending error
    pub fn transaction_not_pending(id: &str, status: TransactionStatus, operation: &str) -> Self {
        LedgerError::TransactionNotPending {
            id: id.to_string(),
            status,
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, user: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            user: user.to_string(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        LedgerError::Config {
            message: message.into(),
        }
    }
}
