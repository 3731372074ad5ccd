//! Transaction-related types for the investment ledger
//!
//! A transaction records one balance-affecting event. Once created, only its
//! status may change, and only from pending to a terminal state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::user::UserId;

/// Transaction identifier (7-char base-36 token)
pub type TransactionId = String;

/// Kind of balance-affecting event
///
/// Whether the amount is a credit or a debit is implied by the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    /// Funds sent to the receiving bank, credited on approval
    Deposit,
    /// Payout request, debited at confirmation
    Withdraw,
    /// Referral reward
    Referral,
    /// Daily check-in bonus
    CheckIn,
    /// Investment profit
    Profit,
    /// Reward-wheel win
    Spin,
}

impl TransactionKind {
    /// Whether transactions of this kind go through admin review
    pub fn requires_review(self) -> bool {
        matches!(self, TransactionKind::Deposit | TransactionKind::Withdraw)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Referral => "referral",
            TransactionKind::CheckIn => "check-in",
            TransactionKind::Profit => "profit",
            TransactionKind::Spin => "spin",
        };
        f.write_str(name)
    }
}

/// Review status of a transaction
///
/// `Pending` moves to exactly one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
}

impl TransactionStatus {
    pub fn is_pending(self) -> bool {
        self == TransactionStatus::Pending
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Bank-transfer details
///
/// For withdrawals this is the payout destination entered by the user; for
/// deposits it is a snapshot of the platform's receiving account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    pub account_holder: String,
    pub account_number: String,
}

impl BankDetails {
    /// True when every field holds something other than whitespace
    pub fn is_complete(&self) -> bool {
        [&self.bank_name, &self.account_holder, &self.account_number]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Stored transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,

    /// Owning user
    pub user_id: UserId,

    /// Always positive; direction follows from `kind`
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub status: TransactionStatus,

    pub timestamp: DateTime<Utc>,

    /// Payment proof attached to deposits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
}
