//! Transaction log
//!
//! This module provides the TransactionLog component that keeps every
//! transaction newest-first and enforces the review state machine:
//!
//! ```text
//! pending ──approve──▶ approved
//!    └─────reject───▶ rejected
//! ```
//!
//! Both targets are terminal. Marking a transaction that is not pending is
//! refused, so a review action can never be applied twice.

use crate::types::{LedgerError, Transaction, TransactionKind, TransactionStatus};

/// Newest-first transaction collection
#[derive(Debug, Default, Clone)]
pub struct TransactionLog {
    /// Most recent transaction at index 0
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        TransactionLog {
            transactions: Vec::new(),
        }
    }

    /// Rebuild a log from a persisted, already newest-first collection
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        TransactionLog { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Record a new transaction ahead of all existing ones
    pub fn prepend(&mut self, tx: Transaction) {
        self.transactions.insert(0, tx);
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Transactions awaiting review, newest first
    pub fn pending(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.status.is_pending())
    }

    /// One user's transactions of one kind, newest first
    pub fn for_user<'a>(
        &'a self,
        user_id: &'a str,
        kind: TransactionKind,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |tx| tx.user_id == user_id && tx.kind == kind)
    }

    /// Fetch a transaction that is still pending
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the id is unknown
    /// - `TransactionNotPending` if it has already been reviewed
    pub fn require_pending(&self, id: &str, operation: &str) -> Result<&Transaction, LedgerError> {
        let tx = self
            .get(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id, operation))?;
        if !tx.status.is_pending() {
            return Err(LedgerError::transaction_not_pending(id, tx.status, operation));
        }
        Ok(tx)
    }

    fn transition(
        &mut self,
        id: &str,
        to: TransactionStatus,
        operation: &str,
    ) -> Result<(), LedgerError> {
        self.require_pending(id, operation)?;
        if let Some(tx) = self.transactions.iter_mut().find(|tx| tx.id == id) {
            tx.status = to;
        }
        Ok(())
    }

    /// Move a pending transaction to approved
    pub fn mark_approved(&mut self, id: &str) -> Result<(), LedgerError> {
        self.transition(id, TransactionStatus::Approved, "approve")
    }

    /// Move a pending transaction to rejected
    pub fn mark_rejected(&mut self, id: &str) -> Result<(), LedgerError> {
        self.transition(id, TransactionStatus::Rejected, "reject")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn tx(id: &str, user: &str, kind: TransactionKind, status: TransactionStatus) -> Transaction {
        Transaction {
            id: id.to_string(),
            user_id: user.to_string(),
            amount: Decimal::from(1000),
            kind,
            status,
            timestamp: "2026-01-01T00:00:00Z".parse().unwrap(),
            screenshot: None,
            bank_details: None,
        }
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut log = TransactionLog::new();
        log.prepend(tx("1", "u", TransactionKind::Deposit, TransactionStatus::Pending));
        log.prepend(tx("2", "u", TransactionKind::CheckIn, TransactionStatus::Approved));
        log.prepend(tx("3", "u", TransactionKind::Withdraw, TransactionStatus::Pending));

        let ids: Vec<&str> = log.transactions().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_pending_filters_by_status() {
        let mut log = TransactionLog::new();
        log.prepend(tx("1", "u", TransactionKind::Deposit, TransactionStatus::Pending));
        log.prepend(tx("2", "u", TransactionKind::Spin, TransactionStatus::Approved));
        log.prepend(tx("3", "u", TransactionKind::Withdraw, TransactionStatus::Pending));

        let ids: Vec<&str> = log.pending().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_for_user_filters_owner_and_kind() {
        let mut log = TransactionLog::new();
        log.prepend(tx("1", "a", TransactionKind::Deposit, TransactionStatus::Pending));
        log.prepend(tx("2", "b", TransactionKind::Deposit, TransactionStatus::Pending));
        log.prepend(tx("3", "a", TransactionKind::Withdraw, TransactionStatus::Pending));
        log.prepend(tx("4", "a", TransactionKind::Deposit, TransactionStatus::Approved));

        let ids: Vec<&str> = log
            .for_user("a", TransactionKind::Deposit)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["4", "1"]);
    }

    #[test]
    fn test_mark_approved_success() {
        let mut log = TransactionLog::new();
        log.prepend(tx("1", "u", TransactionKind::Deposit, TransactionStatus::Pending));

        log.mark_approved("1").unwrap();
        assert_eq!(log.get("1").unwrap().status, TransactionStatus::Approved);
    }

    #[test]
    fn test_mark_rejected_success() {
        let mut log = TransactionLog::new();
        log.prepend(tx("1", "u", TransactionKind::Withdraw, TransactionStatus::Pending));

        log.mark_rejected("1").unwrap();
        assert_eq!(log.get("1").unwrap().status, TransactionStatus::Rejected);
    }

    #[test]
    fn test_terminal_states_refuse_second_transition() {
        let mut log = TransactionLog::new();
        log.prepend(tx("1", "u", TransactionKind::Deposit, TransactionStatus::Pending));
        log.mark_approved("1").unwrap();

        let again = log.mark_approved("1");
        assert!(matches!(
            again,
            Err(LedgerError::TransactionNotPending {
                status: TransactionStatus::Approved,
                ..
            })
        ));

        let reject = log.mark_rejected("1");
        assert!(matches!(reject, Err(LedgerError::TransactionNotPending { .. })));
        assert_eq!(log.get("1").unwrap().status, TransactionStatus::Approved);
    }

    #[test]
    fn test_mark_nonexistent_transaction() {
        let mut log = TransactionLog::new();
        let result = log.mark_rejected("999");
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::TransactionNotFound { .. }
        ));
    }
}
