//! Typed command objects
//!
//! The presentation boundary builds these from raw form input and hands them
//! whole to the ledger; the ledger never reads input fields piecemeal.

use rust_decimal::Decimal;

use super::transaction::BankDetails;
use super::user::UserId;

/// New-account request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Local phone number without the country prefix
    pub phone_digits: String,
    pub password: String,
    /// Referral code of an existing user, if the registrant was referred
    pub referral_code: Option<String>,
}

impl Registration {
    pub fn new(phone_digits: impl Into<String>, password: impl Into<String>) -> Self {
        Registration {
            phone_digits: phone_digits.into(),
            password: password.into(),
            referral_code: None,
        }
    }

    /// Attach a referral code; blank codes are treated as absent
    pub fn referred_by(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        let code = code.trim();
        self.referral_code = if code.is_empty() {
            None
        } else {
            Some(code.to_string())
        };
        self
    }
}

/// Withdrawal form as submitted
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalRequest {
    pub amount: Decimal,
    pub destination: BankDetails,
}

impl WithdrawalRequest {
    pub fn new(
        amount: Decimal,
        bank_name: impl Into<String>,
        account_holder: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        WithdrawalRequest {
            amount,
            destination: BankDetails {
                bank_name: bank_name.into(),
                account_holder: account_holder.into(),
                account_number: account_number.into(),
            },
        }
    }
}

/// A validated withdrawal awaiting explicit confirmation
///
/// Dropping a draft cancels the withdrawal; nothing has been debited yet.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalDraft {
    pub user_id: UserId,
    pub amount: Decimal,
    pub destination: BankDetails,
    /// Amount recorded on the payout transaction once confirmed
    pub net_amount: Decimal,
}
