//! CSV export of ledger collections
//!
//! Admin-facing reports:
//! - users: id, phone, referral code, referrer, balance, spin credits, invested, admin
//! - transactions: id, user, type, status, amount, timestamp, bank details
//!
//! Amounts are written exactly, without rounding. Passwords and screenshots
//! are never exported.

use crate::types::{LedgerError, Transaction, User};
use csv::Writer;
use std::io::Write;

/// Write users in registration order
pub fn write_users_csv(users: &[User], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record([
        "id",
        "phone",
        "referral_code",
        "referred_by",
        "balance",
        "spin_chances",
        "has_invested",
        "is_admin",
        "registered",
    ])?;

    for user in users {
        writer.write_record(&[
            user.id.clone(),
            user.phone_number.clone(),
            user.referral_code.clone(),
            user.referred_by.clone().unwrap_or_default(),
            user.balance.normalize().to_string(),
            user.spin_chances.to_string(),
            user.has_invested.to_string(),
            user.is_admin.to_string(),
            user.registration_date.to_rfc3339(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write transactions newest first, as stored
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record([
        "id",
        "user",
        "type",
        "status",
        "amount",
        "timestamp",
        "bank",
        "holder",
        "account",
    ])?;

    for tx in transactions {
        let (bank, holder, account) = match &tx.bank_details {
            Some(details) => (
                details.bank_name.clone(),
                details.account_holder.clone(),
                details.account_number.clone(),
            ),
            None => Default::default(),
        };
        writer.write_record(&[
            tx.id.clone(),
            tx.user_id.clone(),
            tx.kind.to_string(),
            tx.status.to_string(),
            tx.amount.normalize().to_string(),
            tx.timestamp.to_rfc3339(),
            bank,
            holder,
            account,
        ])?;
    }

    writer.flush()?;
    Ok(())
}
