//! User-related types for the investment ledger
//!
//! A user is both an identity (phone + password) and a wallet (balance,
//! spin credits, investment flag).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// User identifier (7-char base-36 token)
pub type UserId = String;

/// Registered user and wallet state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,

    /// Canonical phone number, country prefix included (`+977 98XXXXXXXX`)
    pub phone_number: String,

    /// Stored and compared as entered
    pub password: String,

    /// Code other registrants use to name this user as their referrer
    pub referral_code: String,

    /// Referral code of the user who referred this one, fixed at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,

    /// Never driven negative by a ledger operation
    pub balance: Decimal,

    #[serde(default)]
    pub total_earnings: Decimal,

    /// Set by the first plan purchase and never cleared
    #[serde(default)]
    pub has_invested: bool,

    #[serde(default)]
    pub is_admin: bool,

    pub registration_date: DateTime<Utc>,

    /// Calendar day of the last daily check-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check_in: Option<NaiveDate>,

    /// Remaining reward-wheel draws
    #[serde(default)]
    pub spin_chances: u32,
}

impl User {
    /// Whether the daily bonus is still claimable on `today`
    pub fn can_check_in(&self, today: NaiveDate) -> bool {
        self.last_check_in != Some(today)
    }
}
