//! Ledger engine
//!
//! This module provides the `Ledger`, which owns the three collections
//! (users, transactions, investments) and applies every state transition to
//! them. Each operation validates first, mutates second and persists last, so
//! a rejected call leaves the collections exactly as they were.
//!
//! The engine enforces business rules such as:
//! - Unique phone numbers and one daily check-in per calendar day
//! - Withdrawals only after a plan purchase, above the minimum, within balance
//! - Balances never going negative
//! - One spin in flight per user

use crate::config::LedgerConfig;
use crate::core::spin::{SpinTicket, SpinWheel};
use crate::core::traits::{Clock, KeyValueStore, SystemClock};
use crate::core::transaction_log::TransactionLog;
use crate::core::user_registry::UserRegistry;
use crate::io::store::{
    load_collection, save_collection, INVESTMENTS_KEY, TRANSACTIONS_KEY, USERS_KEY,
};
use crate::types::{
    BankDetails, InvestmentPlan, InvestmentStatus, LedgerError, Registration, Transaction,
    TransactionKind, TransactionStatus, User, UserId, UserInvestment, WithdrawalDraft,
    WithdrawalRequest,
};
use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 7;
const REFERRAL_CODE_LEN: usize = 6;

/// Random base-36 token of `len` characters
pub(crate) fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Where the client lands after authenticating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Home,
    Admin,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    pub landing: Landing,
    /// One-time welcome after registration
    show_welcome: bool,
}

/// Ends a spin that did not settle when the owning future goes away
struct SpinGuard<'a, S: KeyValueStore> {
    ledger: &'a mut Ledger<S>,
    user_id: &'a str,
}

impl<S: KeyValueStore> Drop for SpinGuard<'_, S> {
    fn drop(&mut self) {
        if self.ledger.wheel.finish(self.user_id).is_ok() {
            warn!(user = %self.user_id, "spin abandoned before settling");
        }
    }
}

/// The investment ledger
///
/// Generic over its durable store; the clock and random source are
/// replaceable for deterministic tests.
pub struct Ledger<S: KeyValueStore> {
    config: LedgerConfig,
    store: S,
    pub(crate) users: UserRegistry,
    pub(crate) transactions: TransactionLog,
    /// Newest first
    investments: Vec<UserInvestment>,
    wheel: SpinWheel,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    session: Option<Session>,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Load the three collections from `store`
    ///
    /// Absent collections start empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the store cannot be
    /// read, or a stored collection does not parse.
    pub fn open(store: S, config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let users = load_collection(&store, USERS_KEY)?;
        let transactions = load_collection(&store, TRANSACTIONS_KEY)?;
        let investments = load_collection(&store, INVESTMENTS_KEY)?;

        Ok(Ledger {
            wheel: SpinWheel::new(config.wheel.clone()),
            config,
            store,
            users: UserRegistry::from_users(users),
            transactions: TransactionLog::from_transactions(transactions),
            investments,
            clock: Arc::new(SystemClock),
            rng: StdRng::from_entropy(),
            session: None,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make identifiers and spin draws reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn users(&self) -> &[User] {
        self.users.users()
    }

    pub fn user(&self, id: &str) -> Result<&User, LedgerError> {
        self.users.require(id)
    }

    /// All transactions, newest first
    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.transactions()
    }

    /// All investments, newest first
    pub fn investments(&self) -> &[UserInvestment] {
        &self.investments
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session
            .as_ref()
            .and_then(|session| self.users.get(&session.user_id))
    }

    /// Whether the welcome should be shown; true at most once per registration
    pub fn take_welcome(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => std::mem::take(&mut session.show_welcome),
            None => false,
        }
    }

    /// Write all three collections
    pub(crate) fn persist(&mut self) -> Result<(), LedgerError> {
        save_collection(&mut self.store, USERS_KEY, self.users.users())?;
        save_collection(
            &mut self.store,
            TRANSACTIONS_KEY,
            self.transactions.transactions(),
        )?;
        save_collection(&mut self.store, INVESTMENTS_KEY, &self.investments)?;
        Ok(())
    }

    fn next_id(&mut self) -> String {
        random_token(&mut self.rng, ID_LEN)
    }

    /// Build an already-approved bonus transaction
    fn approved(&mut self, user_id: &str, amount: Decimal, kind: TransactionKind) -> Transaction {
        Transaction {
            id: self.next_id(),
            user_id: user_id.to_string(),
            amount,
            kind,
            status: TransactionStatus::Approved,
            timestamp: self.clock.now(),
            screenshot: None,
            bank_details: None,
        }
    }

    /// Create an account and sign it in
    ///
    /// The new user starts with the welcome bonus and no spin credits. The
    /// admin flag is set when the local number equals the configured admin
    /// number.
    ///
    /// # Errors
    ///
    /// - `Validation` if the phone number is not exactly `phone_digits` long
    /// - `DuplicatePhone` if the canonical number is already registered
    pub fn register(&mut self, registration: Registration) -> Result<User, LedgerError> {
        let Registration {
            phone_digits,
            password,
            referral_code,
        } = registration;

        if phone_digits.chars().count() != self.config.phone_digits {
            return Err(LedgerError::validation(format!(
                "phone number must have exactly {} digits",
                self.config.phone_digits
            )));
        }

        let phone_number = self.config.canonical_phone(&phone_digits);
        if self.users.find_by_phone(&phone_number).is_some() {
            return Err(LedgerError::DuplicatePhone {
                phone: phone_number,
            });
        }

        let user = User {
            id: self.next_id(),
            phone_number,
            password,
            referral_code: random_token(&mut self.rng, REFERRAL_CODE_LEN).to_uppercase(),
            referred_by: referral_code,
            balance: self.config.welcome_bonus,
            total_earnings: Decimal::ZERO,
            has_invested: false,
            is_admin: phone_digits == self.config.admin_phone,
            registration_date: self.clock.now(),
            last_check_in: None,
            spin_chances: 0,
        };

        self.users.insert(user.clone())?;
        self.persist()?;
        info!(user = %user.id, admin = user.is_admin, "user registered");

        self.session = Some(Session {
            user_id: user.id.clone(),
            landing: Landing::Home,
            show_welcome: true,
        });
        Ok(user)
    }

    /// Sign in with phone and password
    ///
    /// `phone` may be given with or without the country prefix.
    pub fn login(&mut self, phone: &str, password: &str) -> Result<User, LedgerError> {
        let phone = phone.trim();
        let canonical = if phone.starts_with(&self.config.phone_prefix) {
            phone.to_string()
        } else {
            self.config.canonical_phone(phone)
        };

        let user = self
            .users
            .find_by_phone(&canonical)
            .filter(|user| user.password == password)
            .cloned()
            .ok_or(LedgerError::AuthFailed)?;

        self.session = Some(Session {
            user_id: user.id.clone(),
            landing: if user.is_admin {
                Landing::Admin
            } else {
                Landing::Home
            },
            show_welcome: false,
        });
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    /// Claim the daily bonus
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    /// - `AlreadyClaimed` if the bonus was taken earlier on the same calendar day
    pub fn daily_check_in(&mut self, user_id: &str) -> Result<Transaction, LedgerError> {
        let today = self.clock.today();
        let user = self.users.require(user_id)?;
        if !user.can_check_in(today) {
            return Err(LedgerError::AlreadyClaimed { date: today });
        }

        let bonus = self.config.daily_check_in_bonus;
        self.users.credit(user_id, bonus, "check_in")?;
        self.users.update(user_id, |user| {
            user.last_check_in = Some(today);
            Ok(())
        })?;

        let tx = self.approved(user_id, bonus, TransactionKind::CheckIn);
        self.transactions.prepend(tx.clone());
        self.persist()?;
        info!(user = %user_id, %bonus, "daily check-in");
        Ok(tx)
    }

    /// Submit a deposit for review
    ///
    /// The balance is untouched until an admin approves the transaction.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    /// - `Validation` if `amount` is not positive
    /// - `MissingScreenshot` if no payment proof is attached
    pub fn deposit(
        &mut self,
        user_id: &str,
        amount: Decimal,
        screenshot: impl Into<String>,
    ) -> Result<Transaction, LedgerError> {
        self.users.require(user_id)?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::validation("deposit amount must be positive"));
        }
        let screenshot = screenshot.into();
        if screenshot.trim().is_empty() {
            return Err(LedgerError::MissingScreenshot);
        }

        let tx = Transaction {
            id: self.next_id(),
            user_id: user_id.to_string(),
            amount,
            kind: TransactionKind::Deposit,
            status: TransactionStatus::Pending,
            timestamp: self.clock.now(),
            screenshot: Some(screenshot),
            bank_details: Some(self.config.receiving_bank.clone()),
        };
        self.transactions.prepend(tx.clone());
        self.persist()?;
        info!(user = %user_id, %amount, tx = %tx.id, "deposit submitted");
        Ok(tx)
    }

    /// Validate a withdrawal and produce a draft for confirmation
    ///
    /// Nothing is mutated. Checks run in order and the first failure wins.
    ///
    /// # Errors
    ///
    /// - `WithdrawalBlocked` if the user never purchased a plan
    /// - `BelowMinimum` if the amount is under the configured minimum
    /// - `InsufficientBalance` if the amount exceeds the balance
    /// - `IncompleteDetails` if any bank field is empty
    pub fn initiate_withdraw(
        &self,
        user_id: &str,
        request: WithdrawalRequest,
    ) -> Result<WithdrawalDraft, LedgerError> {
        let user = self.users.require(user_id)?;
        let WithdrawalRequest {
            amount,
            destination,
        } = request;

        if !user.has_invested {
            return Err(LedgerError::WithdrawalBlocked {
                user: user_id.to_string(),
            });
        }
        if amount < self.config.min_withdraw {
            return Err(LedgerError::BelowMinimum {
                minimum: self.config.min_withdraw,
                requested: amount,
            });
        }
        if amount > user.balance {
            return Err(LedgerError::insufficient_balance(
                user_id,
                user.balance,
                amount,
            ));
        }
        if !destination.is_complete() {
            return Err(LedgerError::IncompleteDetails);
        }

        Ok(WithdrawalDraft {
            user_id: user_id.to_string(),
            amount,
            net_amount: self.config.net_withdrawal(amount),
            destination: BankDetails {
                bank_name: destination.bank_name.trim().to_string(),
                account_holder: destination.account_holder.trim().to_string(),
                account_number: destination.account_number.trim().to_string(),
            },
        })
    }

    /// Commit a confirmed withdrawal
    ///
    /// Debits the gross amount now and records a pending payout of the net
    /// (post-fee) amount.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user no longer exists
    /// - `InsufficientBalance` if the balance dropped below the amount since the draft
    pub fn confirm_withdraw(&mut self, draft: WithdrawalDraft) -> Result<Transaction, LedgerError> {
        self.users.debit(&draft.user_id, draft.amount)?;

        let tx = Transaction {
            id: self.next_id(),
            user_id: draft.user_id.clone(),
            amount: draft.net_amount,
            kind: TransactionKind::Withdraw,
            status: TransactionStatus::Pending,
            timestamp: self.clock.now(),
            screenshot: None,
            bank_details: Some(draft.destination),
        };
        self.transactions.prepend(tx.clone());
        self.persist()?;
        info!(
            user = %draft.user_id,
            gross = %draft.amount,
            net = %draft.net_amount,
            tx = %tx.id,
            "withdrawal requested"
        );
        Ok(tx)
    }

    pub fn plans(&self) -> &[InvestmentPlan] {
        &self.config.plans
    }

    pub fn plan(&self, plan_id: &str) -> Result<&InvestmentPlan, LedgerError> {
        self.config
            .plan(plan_id)
            .ok_or_else(|| LedgerError::PlanNotFound {
                id: plan_id.to_string(),
            })
    }

    /// Buy a plan from the catalog
    ///
    /// Debits the plan price, marks the user as invested for good and records
    /// an investment expiring after the fixed investment term.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` if the plan id is not in the catalog
    /// - `InsufficientBalance` if the balance is below the price; the caller
    ///   should send the user to the deposit screen
    pub fn purchase_investment(
        &mut self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<UserInvestment, LedgerError> {
        let plan = self.plan(plan_id)?.clone();
        self.users.debit(user_id, plan.price)?;
        self.users.update(user_id, |user| {
            user.has_invested = true;
            Ok(())
        })?;

        let start = self.clock.now();
        let investment = UserInvestment {
            id: self.next_id(),
            user_id: user_id.to_string(),
            plan_id: plan.id.clone(),
            amount: plan.price,
            daily_profit: plan.daily_profit,
            start_date: start,
            expiry_date: start + Duration::days(self.config.investment_term_days),
            status: InvestmentStatus::Active,
        };
        self.investments.insert(0, investment.clone());
        self.persist()?;
        info!(user = %user_id, plan = %plan.id, price = %plan.price, "plan purchased");
        Ok(investment)
    }

    /// Start a spin: draw the segment and mark the user in flight
    ///
    /// The reward is not credited until [`Ledger::settle_spin`].
    ///
    /// # Errors
    ///
    /// - `NoSpinCredits` if the user has no credits left
    /// - `SpinInFlight` if a spin for this user has not settled yet
    pub fn begin_spin(&mut self, user_id: &str) -> Result<SpinTicket, LedgerError> {
        let user = self.users.require(user_id)?;
        if user.spin_chances == 0 {
            return Err(LedgerError::NoSpinCredits {
                user: user_id.to_string(),
            });
        }
        self.wheel.start(user_id, &mut self.rng)
    }

    /// Credit the spin drawn for `user_id` and consume one credit
    ///
    /// The reward is the one drawn by [`Ledger::begin_spin`]; nothing the
    /// caller holds can change it.
    ///
    /// # Errors
    ///
    /// - `SpinNotInFlight` if no spin was started or it already ended
    /// - `NoSpinCredits` if the credit was spent in the meantime
    pub fn settle_spin(&mut self, user_id: &str) -> Result<Transaction, LedgerError> {
        let reward = self
            .wheel
            .pending(user_id)
            .map(|ticket| ticket.reward)
            .ok_or_else(|| LedgerError::SpinNotInFlight {
                user: user_id.to_string(),
            })?;

        if self.users.require(user_id)?.spin_chances == 0 {
            return Err(LedgerError::NoSpinCredits {
                user: user_id.to_string(),
            });
        }

        self.users.credit(user_id, reward, "spin")?;
        self.users.consume_spin(user_id)?;
        self.wheel.finish(user_id)?;

        let tx = self.approved(user_id, reward, TransactionKind::Spin);
        self.transactions.prepend(tx.clone());
        self.persist()?;
        info!(user = %user_id, %reward, "spin settled");
        Ok(tx)
    }

    /// Abandon a started spin without crediting it or using a credit
    pub fn cancel_spin(&mut self, user_id: &str) -> Result<SpinTicket, LedgerError> {
        let ticket = self.wheel.finish(user_id)?;
        info!(user = %user_id, "spin cancelled");
        Ok(ticket)
    }

    /// Run a whole spin, waiting out the wheel animation before crediting
    ///
    /// If the returned future is dropped before it completes, the spin is
    /// cancelled and the user may spin again.
    pub async fn spin(&mut self, user_id: &str) -> Result<(SpinTicket, Transaction), LedgerError> {
        let ticket = self.begin_spin(user_id)?;
        let delay = self.wheel.config().settle_delay();

        let mut guard = SpinGuard {
            ledger: self,
            user_id,
        };
        tokio::time::sleep(delay).await;
        let tx = guard.ledger.settle_spin(user_id)?;
        Ok((ticket, tx))
    }

    /// One user's transactions of one kind, newest first
    pub fn history<'a>(&'a self, user_id: &'a str, kind: TransactionKind) -> Vec<&'a Transaction> {
        self.transactions.for_user(user_id, kind).collect()
    }

    /// Users registered with this user's referral code
    pub fn direct_referrals(&self, user_id: &str) -> Result<Vec<&User>, LedgerError> {
        let code = self.users.require(user_id)?.referral_code.as_str();
        Ok(self.users.referred_by(code).collect())
    }

    /// One user's investments, newest first
    pub fn investments_for(&self, user_id: &str) -> Vec<&UserInvestment> {
        self.investments
            .iter()
            .filter(|investment| investment.user_id == user_id)
            .collect()
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::ManualClock;
    use crate::io::store::MemoryStore;
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    fn start() -> DateTime<Utc> {
        "2026-03-10T09:00:00Z".parse().unwrap()
    }

    fn ledger_with_clock() -> (Ledger<MemoryStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let ledger = Ledger::open(MemoryStore::new(), LedgerConfig::default())
            .unwrap()
            .with_clock(clock.clone())
            .with_seed(11);
        (ledger, clock)
    }

    fn ledger() -> Ledger<MemoryStore> {
        ledger_with_clock().0
    }

    fn register(ledger: &mut Ledger<MemoryStore>, phone: &str) -> User {
        ledger.register(Registration::new(phone, "pw")).unwrap()
    }

    fn fund(ledger: &mut Ledger<MemoryStore>, user_id: &str, amount: i64) {
        ledger
            .users
            .credit(user_id, Decimal::from(amount), "test")
            .unwrap();
    }

    fn withdrawal(amount: i64) -> WithdrawalRequest {
        WithdrawalRequest::new(Decimal::from(amount), "Bank", "Holder", "0123456789")
    }

    #[test]
    fn test_random_token_alphabet() {
        let mut rng = StdRng::seed_from_u64(1);
        let token = random_token(&mut rng, 7);
        assert_eq!(token.len(), 7);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_register_creates_user_with_welcome_bonus() {
        let mut ledger = ledger();
        let user = ledger
            .register(Registration::new("9811111111", "pw").referred_by("ABC123"))
            .unwrap();

        assert_eq!(user.phone_number, "+977 9811111111");
        assert_eq!(user.balance, Decimal::from(100));
        assert_eq!(user.spin_chances, 0);
        assert_eq!(user.referred_by.as_deref(), Some("ABC123"));
        assert_eq!(user.referral_code.len(), 6);
        assert_eq!(user.referral_code, user.referral_code.to_uppercase());
        assert!(!user.is_admin);
        assert!(!user.has_invested);
        assert_eq!(user.registration_date, start());
        assert_eq!(ledger.users().len(), 1);
    }

    #[test]
    fn test_register_opens_session_with_one_time_welcome() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");

        assert_eq!(ledger.current_user().unwrap().id, user.id);
        assert!(ledger.take_welcome());
        assert!(!ledger.take_welcome());
    }

    #[test]
    fn test_register_admin_sentinel() {
        let mut ledger = ledger();
        let admin = register(&mut ledger, "9800000000");
        assert!(admin.is_admin);
    }

    #[rstest]
    #[case::too_short("981111111")]
    #[case::too_long("98111111111")]
    #[case::empty("")]
    fn test_register_rejects_wrong_length(#[case] phone: &str) {
        let mut ledger = ledger();
        let result = ledger.register(Registration::new(phone, "pw"));
        assert!(matches!(result, Err(LedgerError::Validation { .. })));
        assert!(ledger.users().is_empty());
        assert!(ledger.session().is_none());
    }

    #[test]
    fn test_register_duplicate_phone_does_not_mutate() {
        let mut ledger = ledger();
        register(&mut ledger, "9811111111");
        let before = ledger.users().to_vec();

        let result = ledger.register(Registration::new("9811111111", "other"));
        assert!(matches!(result, Err(LedgerError::DuplicatePhone { .. })));
        assert_eq!(ledger.users(), before.as_slice());
        assert!(ledger.transactions().is_empty());
    }

    #[rstest]
    #[case::local("9811111111", "pw", true)]
    #[case::prefixed("+977 9811111111", "pw", true)]
    #[case::wrong_password("9811111111", "nope", false)]
    #[case::unknown_phone("9899999999", "pw", false)]
    fn test_login(#[case] phone: &str, #[case] password: &str, #[case] ok: bool) {
        let mut ledger = ledger();
        register(&mut ledger, "9811111111");
        ledger.logout();

        let result = ledger.login(phone, password);
        if ok {
            assert_eq!(result.unwrap().phone_number, "+977 9811111111");
            assert_eq!(ledger.session().unwrap().landing, Landing::Home);
            assert!(!ledger.take_welcome());
        } else {
            assert_eq!(result.unwrap_err(), LedgerError::AuthFailed);
            assert!(ledger.session().is_none());
        }
    }

    #[test]
    fn test_admin_login_lands_on_admin() {
        let mut ledger = ledger();
        register(&mut ledger, "9800000000");
        ledger.logout();

        ledger.login("9800000000", "pw").unwrap();
        assert_eq!(ledger.session().unwrap().landing, Landing::Admin);
    }

    #[test]
    fn test_daily_check_in_once_per_day() {
        let (mut ledger, clock) = ledger_with_clock();
        let user = register(&mut ledger, "9811111111");

        let tx = ledger.daily_check_in(&user.id).unwrap();
        assert_eq!(tx.kind, TransactionKind::CheckIn);
        assert_eq!(tx.status, TransactionStatus::Approved);
        assert_eq!(tx.amount, Decimal::from(10));

        clock.advance(Duration::hours(3));
        let again = ledger.daily_check_in(&user.id);
        assert!(matches!(again, Err(LedgerError::AlreadyClaimed { .. })));

        assert_eq!(ledger.user(&user.id).unwrap().balance, Decimal::from(110));
        assert_eq!(ledger.transactions().len(), 1);

        clock.advance(Duration::days(1));
        ledger.daily_check_in(&user.id).unwrap();
        assert_eq!(ledger.user(&user.id).unwrap().balance, Decimal::from(120));
    }

    #[test]
    fn test_deposit_is_pending_and_leaves_balance() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");

        let tx = ledger
            .deposit(&user.id, Decimal::from(1000), "data:image/png;base64,AAAA")
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.kind, TransactionKind::Deposit);
        assert_eq!(tx.bank_details.as_ref(), Some(&ledger.config().receiving_bank));
        assert_eq!(ledger.user(&user.id).unwrap().balance, Decimal::from(100));
    }

    #[rstest]
    #[case::no_screenshot(1000, "", "screenshot")]
    #[case::zero_amount(0, "img", "amount")]
    #[case::negative_amount(-5, "img", "amount")]
    fn test_deposit_rejections(#[case] amount: i64, #[case] screenshot: &str, #[case] what: &str) {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");

        let result = ledger.deposit(&user.id, Decimal::from(amount), screenshot);
        match what {
            "screenshot" => assert_eq!(result.unwrap_err(), LedgerError::MissingScreenshot),
            _ => assert!(matches!(result, Err(LedgerError::Validation { .. }))),
        }
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_initiate_withdraw_checks_in_order() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");

        // Not invested wins over every other failure
        let blocked = ledger.initiate_withdraw(
            &user.id,
            WithdrawalRequest::new(Decimal::from(10), "", "", ""),
        );
        assert!(matches!(blocked, Err(LedgerError::WithdrawalBlocked { .. })));

        fund(&mut ledger, &user.id, 1000);
        ledger.purchase_investment(&user.id, "v1").unwrap();
        fund(&mut ledger, &user.id, 900);

        let below = ledger.initiate_withdraw(
            &user.id,
            WithdrawalRequest::new(Decimal::from(50), "", "", ""),
        );
        assert!(matches!(below, Err(LedgerError::BelowMinimum { .. })));

        let over = ledger.initiate_withdraw(
            &user.id,
            WithdrawalRequest::new(Decimal::from(5000), "", "", ""),
        );
        assert!(matches!(over, Err(LedgerError::InsufficientBalance { .. })));

        let incomplete = ledger.initiate_withdraw(
            &user.id,
            WithdrawalRequest::new(Decimal::from(500), "Bank", "", "123"),
        );
        assert_eq!(incomplete.unwrap_err(), LedgerError::IncompleteDetails);

        let draft = ledger.initiate_withdraw(&user.id, withdrawal(500)).unwrap();
        assert_eq!(draft.net_amount, Decimal::from(400));
        assert_eq!(ledger.user(&user.id).unwrap().balance, Decimal::from(1000));
    }

    #[test]
    fn test_confirm_withdraw_debits_gross_records_net() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        fund(&mut ledger, &user.id, 1900);
        ledger.purchase_investment(&user.id, "v1").unwrap();
        assert_eq!(ledger.user(&user.id).unwrap().balance, Decimal::from(1000));

        let draft = ledger.initiate_withdraw(&user.id, withdrawal(1000)).unwrap();
        let tx = ledger.confirm_withdraw(draft).unwrap();

        assert_eq!(ledger.user(&user.id).unwrap().balance, Decimal::ZERO);
        assert_eq!(tx.amount, Decimal::from(800));
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.kind, TransactionKind::Withdraw);
        assert_eq!(tx.bank_details.unwrap().account_number, "0123456789");
    }

    #[test]
    fn test_confirm_stale_draft_fails_without_mutation() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        fund(&mut ledger, &user.id, 1900);
        ledger.purchase_investment(&user.id, "v1").unwrap();

        let first = ledger.initiate_withdraw(&user.id, withdrawal(1000)).unwrap();
        let second = first.clone();
        ledger.confirm_withdraw(first).unwrap();

        let result = ledger.confirm_withdraw(second);
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn test_purchase_investment() {
        let (mut ledger, _clock) = ledger_with_clock();
        let user = register(&mut ledger, "9811111111");

        let poor = ledger.purchase_investment(&user.id, "v1");
        assert!(matches!(poor, Err(LedgerError::InsufficientBalance { .. })));
        assert!(!ledger.user(&user.id).unwrap().has_invested);
        assert!(ledger.investments().is_empty());

        fund(&mut ledger, &user.id, 2000);
        let investment = ledger.purchase_investment(&user.id, "v2").unwrap();

        let after = ledger.user(&user.id).unwrap();
        assert_eq!(after.balance, Decimal::from(100));
        assert!(after.has_invested);
        assert_eq!(investment.amount, Decimal::from(2000));
        assert_eq!(investment.daily_profit, Decimal::from(300));
        assert_eq!(investment.expiry_date - investment.start_date, Duration::days(100));
        assert_eq!(investment.status, InvestmentStatus::Active);
        assert_eq!(ledger.investments_for(&user.id).len(), 1);
    }

    #[test]
    fn test_purchase_unknown_plan() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        let result = ledger.purchase_investment(&user.id, "v99");
        assert!(matches!(result, Err(LedgerError::PlanNotFound { .. })));
    }

    #[test]
    fn test_has_invested_survives_spending() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        fund(&mut ledger, &user.id, 1300);
        ledger.purchase_investment(&user.id, "v1").unwrap();

        let draft = ledger.initiate_withdraw(&user.id, withdrawal(400)).unwrap();
        ledger.confirm_withdraw(draft).unwrap();

        let after = ledger.user(&user.id).unwrap();
        assert_eq!(after.balance, Decimal::ZERO);
        assert!(after.has_invested);
    }

    #[test]
    fn test_spin_requires_credit() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        let result = ledger.begin_spin(&user.id);
        assert!(matches!(result, Err(LedgerError::NoSpinCredits { .. })));
    }

    #[test]
    fn test_spin_two_phase() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        ledger.users.grant_spin(&user.id).unwrap();
        ledger.users.grant_spin(&user.id).unwrap();

        let ticket = ledger.begin_spin(&user.id).unwrap();
        let reentry = ledger.begin_spin(&user.id);
        assert!(matches!(reentry, Err(LedgerError::SpinInFlight { .. })));

        // Nothing credited mid-flight
        assert_eq!(ledger.user(&user.id).unwrap().balance, Decimal::from(100));

        let tx = ledger.settle_spin(&user.id).unwrap();
        assert_eq!(tx.kind, TransactionKind::Spin);
        assert_eq!(tx.status, TransactionStatus::Approved);
        assert_eq!(tx.amount, ticket.reward);

        let after = ledger.user(&user.id).unwrap();
        assert_eq!(after.balance, Decimal::from(100) + ticket.reward);
        assert_eq!(after.spin_chances, 1);

        let double = ledger.settle_spin(&user.id);
        assert!(matches!(double, Err(LedgerError::SpinNotInFlight { .. })));
        assert_eq!(ledger.user(&user.id).unwrap().spin_chances, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_spin_credits_after_delay() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        ledger.users.grant_spin(&user.id).unwrap();

        let (ticket, tx) = ledger.spin(&user.id).await.unwrap();
        assert!(ledger.config().wheel.rewards.contains(&ticket.reward));
        assert_eq!(tx.amount, ticket.reward);
        assert_eq!(ledger.user(&user.id).unwrap().spin_chances, 0);
    }

    #[test]
    fn test_spin_credits_the_drawn_reward_only() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        ledger.users.grant_spin(&user.id).unwrap();

        let mut ticket = ledger.begin_spin(&user.id).unwrap();
        let drawn = ticket.reward;
        ticket.reward = Decimal::from(1_000_000);

        let tx = ledger.settle_spin(&ticket.user_id).unwrap();
        assert_eq!(tx.amount, drawn);
        assert!(ledger.config().wheel.rewards.contains(&tx.amount));
        assert_eq!(
            ledger.user(&user.id).unwrap().balance,
            Decimal::from(100) + drawn
        );
    }

    #[test]
    fn test_cancel_spin_keeps_credit() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        ledger.users.grant_spin(&user.id).unwrap();

        let ticket = ledger.begin_spin(&user.id).unwrap();
        assert_eq!(ledger.cancel_spin(&user.id).unwrap(), ticket);

        let after = ledger.user(&user.id).unwrap();
        assert_eq!(after.spin_chances, 1);
        assert_eq!(after.balance, Decimal::from(100));
        assert!(ledger.transactions().is_empty());

        let settle = ledger.settle_spin(&user.id);
        assert!(matches!(settle, Err(LedgerError::SpinNotInFlight { .. })));
        assert!(ledger.begin_spin(&user.id).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_spin_future_releases_the_wheel() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        ledger.users.grant_spin(&user.id).unwrap();

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            ledger.spin(&user.id),
        )
        .await;
        assert!(timed_out.is_err());

        let after = ledger.user(&user.id).unwrap();
        assert_eq!(after.spin_chances, 1);
        assert_eq!(after.balance, Decimal::from(100));

        let (_, tx) = ledger.spin(&user.id).await.unwrap();
        assert_eq!(tx.kind, TransactionKind::Spin);
        assert_eq!(ledger.user(&user.id).unwrap().spin_chances, 0);
    }

    #[test]
    fn test_history_and_referrals() {
        let mut ledger = ledger();
        let referrer = register(&mut ledger, "9811111111");
        let member = ledger
            .register(Registration::new("9822222222", "pw").referred_by(&referrer.referral_code))
            .unwrap();
        register(&mut ledger, "9833333333");

        ledger.deposit(&member.id, Decimal::from(1000), "img").unwrap();
        ledger.deposit(&member.id, Decimal::from(2000), "img").unwrap();
        ledger.daily_check_in(&member.id).unwrap();

        let deposits = ledger.history(&member.id, TransactionKind::Deposit);
        assert_eq!(deposits.len(), 2);
        assert_eq!(deposits[0].amount, Decimal::from(2000));
        assert!(ledger.history(&member.id, TransactionKind::Withdraw).is_empty());

        let team = ledger.direct_referrals(&referrer.id).unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].id, member.id);
    }

    #[test]
    fn test_collections_persist_after_each_operation() {
        let mut ledger = ledger();
        let user = register(&mut ledger, "9811111111");
        ledger.deposit(&user.id, Decimal::from(1000), "img").unwrap();

        let users: Vec<User> = load_collection(ledger.store(), USERS_KEY).unwrap();
        let transactions: Vec<Transaction> =
            load_collection(ledger.store(), TRANSACTIONS_KEY).unwrap();
        assert_eq!(users, ledger.users());
        assert_eq!(transactions, ledger.transactions());
    }
}
