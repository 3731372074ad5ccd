//! Admin review workflow
//!
//! Pending deposits and withdrawals are resolved here. Approval is the only
//! place a deposit reaches a balance, and the only place a referrer earns a
//! spin credit. Every action first checks the transaction is still pending,
//! so nothing is ever applied twice.

use crate::core::engine::Ledger;
use crate::core::traits::KeyValueStore;
use crate::types::{LedgerError, Transaction, TransactionKind};
use tracing::{info, warn};

/// Counters for the admin overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dashboard {
    pub user_count: usize,
    pub pending_count: usize,
}

/// Only deposits and withdrawals go through review
fn ensure_reviewable(tx: &Transaction) -> Result<(), LedgerError> {
    if tx.kind.requires_review() {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "{} transaction {} is not subject to review",
            tx.kind, tx.id
        )))
    }
}

impl<S: KeyValueStore> Ledger<S> {
    /// Fail unless `user_id` names an admin
    pub fn require_admin(&self, user_id: &str) -> Result<(), LedgerError> {
        if self.user(user_id)?.is_admin {
            Ok(())
        } else {
            Err(LedgerError::NotAdmin {
                user: user_id.to_string(),
            })
        }
    }

    /// Transactions awaiting review, newest first
    pub fn pending_transactions(&self) -> Vec<&Transaction> {
        self.transactions.pending().collect()
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            user_count: self.users.len(),
            pending_count: self.transactions.pending().count(),
        }
    }

    /// Approve a pending transaction
    ///
    /// For a deposit, credits the owner. When the deposit reaches the referral
    /// threshold and the owner was referred, the referrer gains one spin credit.
    /// A withdrawal was already debited at confirmation, so approving it only
    /// changes the status.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the id is unknown
    /// - `TransactionNotPending` if it was already approved or rejected
    /// - `Validation` if its kind is never reviewed (check-in, spin, ...)
    pub fn approve_transaction(&mut self, tx_id: &str) -> Result<Transaction, LedgerError> {
        let tx = self.transactions.require_pending(tx_id, "approve")?.clone();
        ensure_reviewable(&tx)?;

        if tx.kind == TransactionKind::Deposit {
            match self.users.get(&tx.user_id).cloned() {
                Some(owner) => {
                    self.users.credit(&owner.id, tx.amount, "approve_deposit")?;
                    if tx.amount >= self.config().referral_spin_threshold {
                        if let Some(code) = owner.referred_by.as_deref() {
                            self.reward_referrer(code, &owner.id)?;
                        }
                    }
                }
                None => warn!(tx = %tx.id, user = %tx.user_id, "approved deposit has no owner"),
            }
        }

        self.transactions.mark_approved(tx_id)?;
        self.persist()?;
        info!(tx = %tx.id, kind = %tx.kind, amount = %tx.amount, "transaction approved");

        self.transactions
            .get(tx_id)
            .cloned()
            .ok_or_else(|| LedgerError::transaction_not_found(tx_id, "approve"))
    }

    fn reward_referrer(&mut self, code: &str, referee: &str) -> Result<(), LedgerError> {
        let referrer = self.users.find_by_referral_code(code).map(|u| u.id.clone());
        match referrer {
            Some(referrer) => {
                self.users.grant_spin(&referrer)?;
                info!(%referrer, %referee, "referral spin credit granted");
            }
            None => warn!(%code, %referee, "referral code matches no user"),
        }
        Ok(())
    }

    /// Reject a pending transaction
    ///
    /// Only the status changes. A rejected withdrawal is not refunded.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the id is unknown
    /// - `TransactionNotPending` if it was already approved or rejected
    /// - `Validation` if its kind is never reviewed (check-in, spin, ...)
    pub fn reject_transaction(&mut self, tx_id: &str) -> Result<Transaction, LedgerError> {
        ensure_reviewable(self.transactions.require_pending(tx_id, "reject")?)?;
        self.transactions.mark_rejected(tx_id)?;
        self.persist()?;

        let tx = self
            .transactions
            .get(tx_id)
            .cloned()
            .ok_or_else(|| LedgerError::transaction_not_found(tx_id, "reject"))?;
        if tx.kind == TransactionKind::Withdraw {
            warn!(tx = %tx.id, user = %tx.user_id, amount = %tx.amount, "withdrawal rejected without refund");
        } else {
            info!(tx = %tx.id, kind = %tx.kind, "transaction rejected");
        }
        Ok(tx)
    }
}
