//! User registry module
//!
//! This module provides the `UserRegistry` struct which owns the user
//! collection and performs every balance and spin-credit mutation.
//!
//! The UserRegistry is responsible for:
//! - Keeping users in registration order
//! - Looking users up by id, canonical phone number and referral code
//! - Crediting and debiting balances with checked arithmetic
//! - Granting and consuming spin credits

use crate::types::{LedgerError, User};
use rust_decimal::Decimal;

/// Owns all users and their wallet state
#[derive(Debug, Default, Clone)]
pub struct UserRegistry {
    /// Users in registration order
    users: Vec<User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        UserRegistry { users: Vec::new() }
    }

    /// Rebuild a registry from a persisted collection
    pub fn from_users(users: Vec<User>) -> Self {
        UserRegistry { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Get a user or fail with `UserNotFound`
    pub fn require(&self, id: &str) -> Result<&User, LedgerError> {
        self.get(id).ok_or_else(|| LedgerError::user_not_found(id))
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut User, LedgerError> {
        self.users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| LedgerError::user_not_found(id))
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<&User> {
        self.users.iter().find(|user| user.phone_number == phone)
    }

    pub fn find_by_referral_code(&self, code: &str) -> Option<&User> {
        self.users.iter().find(|user| user.referral_code == code)
    }

    /// Users whose `referred_by` names `code`, in registration order
    pub fn referred_by<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a User> + 'a {
        self.users
            .iter()
            .filter(move |user| user.referred_by.as_deref() == Some(code))
    }

    /// Append a newly registered user
    ///
    /// Fails with `DuplicatePhone` if the phone number is taken.
    pub fn insert(&mut self, user: User) -> Result<(), LedgerError> {
        if self.find_by_phone(&user.phone_number).is_some() {
            return Err(LedgerError::DuplicatePhone {
                phone: user.phone_number,
            });
        }
        self.users.push(user);
        Ok(())
    }

    /// Apply an arbitrary in-place update to one user
    pub fn update<F>(&mut self, id: &str, f: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut User) -> Result<(), LedgerError>,
    {
        let user = self.require_mut(id)?;
        f(user)
    }

    /// Add funds to a user's balance
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    /// - `ArithmeticOverflow` if the balance cannot represent the result
    pub fn credit(&mut self, id: &str, amount: Decimal, operation: &str) -> Result<(), LedgerError> {
        let user = self.require_mut(id)?;

        let new_balance = user
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation, id))?;

        user.balance = new_balance;
        Ok(())
    }

    /// Remove funds from a user's balance
    ///
    /// Validates the balance covers the debit before touching it, so a
    /// balance never goes negative.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    /// - `InsufficientBalance` if `amount` exceeds the balance
    pub fn debit(&mut self, id: &str, amount: Decimal) -> Result<(), LedgerError> {
        let user = self.require_mut(id)?;

        if user.balance < amount {
            return Err(LedgerError::insufficient_balance(id, user.balance, amount));
        }

        user.balance -= amount;
        Ok(())
    }

    /// Grant one spin credit, without upper bound
    pub fn grant_spin(&mut self, id: &str) -> Result<(), LedgerError> {
        let user = self.require_mut(id)?;
        user.spin_chances = user
            .spin_chances
            .checked_add(1)
            .ok_or_else(|| LedgerError::arithmetic_overflow("grant_spin", id))?;
        Ok(())
    }

    /// Use up one spin credit
    pub fn consume_spin(&mut self, id: &str) -> Result<(), LedgerError> {
        let user = self.require_mut(id)?;
        user.spin_chances = user
            .spin_chances
            .checked_sub(1)
            .ok_or_else(|| LedgerError::NoSpinCredits {
                user: id.to_string(),
            })?;
        Ok(())
    }
}
