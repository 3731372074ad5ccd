//! Command execution
//!
//! Turns parsed arguments into typed ledger commands and renders the result
//! as plain text. User-scoped commands sign in first; admin commands also
//! require the admin flag.

use super::args::{Command, Credentials};
use crate::core::{KeyValueStore, Ledger};
use crate::io::csv_format::{write_transactions_csv, write_users_csv};
use crate::types::{LedgerError, Registration, Transaction, User, WithdrawalRequest};
use std::io::Write;

fn sign_in<S: KeyValueStore>(
    ledger: &mut Ledger<S>,
    auth: &Credentials,
) -> Result<User, LedgerError> {
    ledger.login(&auth.phone, &auth.password)
}

fn sign_in_admin<S: KeyValueStore>(
    ledger: &mut Ledger<S>,
    auth: &Credentials,
) -> Result<User, LedgerError> {
    let user = sign_in(ledger, auth)?;
    ledger.require_admin(&user.id)?;
    Ok(user)
}

fn write_user(out: &mut dyn Write, user: &User) -> Result<(), LedgerError> {
    writeln!(out, "id:            {}", user.id)?;
    writeln!(out, "phone:         {}", user.phone_number)?;
    writeln!(out, "referral code: {}", user.referral_code)?;
    writeln!(out, "balance:       {}", user.balance)?;
    writeln!(out, "spin credits:  {}", user.spin_chances)?;
    writeln!(out, "invested:      {}", user.has_invested)?;
    if user.is_admin {
        writeln!(out, "role:          admin")?;
    }
    Ok(())
}

fn write_transaction(out: &mut dyn Write, tx: &Transaction) -> Result<(), LedgerError> {
    writeln!(
        out,
        "{}  {:<8}  {:<8}  {:>10}  {}  user {}",
        tx.id,
        tx.kind,
        tx.status,
        tx.amount,
        tx.timestamp.format("%Y-%m-%d %H:%M"),
        tx.user_id
    )?;
    Ok(())
}

/// Execute one command against `ledger`, writing its output to `out`
pub async fn execute<S: KeyValueStore>(
    ledger: &mut Ledger<S>,
    command: Command,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    match command {
        Command::Register {
            phone,
            password,
            referral,
        } => {
            let mut registration = Registration::new(phone, password);
            if let Some(code) = referral {
                registration = registration.referred_by(code);
            }
            let user = ledger.register(registration)?;
            if ledger.take_welcome() {
                writeln!(
                    out,
                    "Welcome! {} has been added to your balance.",
                    ledger.config().welcome_bonus
                )?;
            }
            write_user(out, &user)?;
        }
        Command::Login(auth) => {
            let user = sign_in(ledger, &auth)?;
            write_user(out, &user)?;
        }
        Command::CheckIn(auth) => {
            let user = sign_in(ledger, &auth)?;
            let tx = ledger.daily_check_in(&user.id)?;
            writeln!(out, "Check-in bonus of {} credited.", tx.amount)?;
        }
        Command::Deposit {
            auth,
            amount,
            screenshot,
        } => {
            let user = sign_in(ledger, &auth)?;
            let tx = ledger.deposit(&user.id, amount, screenshot)?;
            let bank = &ledger.config().receiving_bank;
            writeln!(out, "Deposit {} submitted for review ({}).", tx.amount, tx.id)?;
            writeln!(
                out,
                "Pay to: {} / {} / {}",
                bank.bank_name, bank.account_holder, bank.account_number
            )?;
            let presets: Vec<String> = ledger
                .config()
                .deposit_presets
                .iter()
                .map(|amount| amount.to_string())
                .collect();
            if !presets.is_empty() {
                writeln!(out, "Quick amounts: {}", presets.join(", "))?;
            }
        }
        Command::Withdraw {
            auth,
            amount,
            bank,
            holder,
            account,
            confirm,
        } => {
            let user = sign_in(ledger, &auth)?;
            let request = WithdrawalRequest::new(amount, bank, holder, account);
            let draft = ledger.initiate_withdraw(&user.id, request)?;
            writeln!(
                out,
                "Withdraw {} to {} / {} / {}; you will receive {}.",
                draft.amount,
                draft.destination.bank_name,
                draft.destination.account_holder,
                draft.destination.account_number,
                draft.net_amount
            )?;
            if confirm {
                let tx = ledger.confirm_withdraw(draft)?;
                writeln!(out, "Withdrawal submitted for review ({}).", tx.id)?;
            } else {
                writeln!(out, "Re-run with --confirm to submit.")?;
            }
        }
        Command::Plans => {
            for plan in ledger.plans() {
                writeln!(
                    out,
                    "{:<4} {:<8} price {:>6}  daily {:>5}  {} days  {}%",
                    plan.id, plan.name, plan.price, plan.daily_profit, plan.duration, plan.returns
                )?;
            }
        }
        Command::Support => {
            let support = &ledger.config().support;
            writeln!(out, "Customer support: {}", support.customer_support)?;
            writeln!(out, "Community:        {}", support.community_group)?;
        }
        Command::Invest { auth, plan } => {
            let user = sign_in(ledger, &auth)?;
            let investment = ledger.purchase_investment(&user.id, &plan)?;
            writeln!(
                out,
                "Plan {} active until {}.",
                investment.plan_id,
                investment.expiry_date.format("%Y-%m-%d")
            )?;
        }
        Command::Spin(auth) => {
            let user = sign_in(ledger, &auth)?;
            let (ticket, _) = ledger.spin(&user.id).await?;
            writeln!(
                out,
                "The wheel stops at {} degrees: you won {}.",
                ticket.settle_angle, ticket.reward
            )?;
        }
        Command::History { auth, kind } => {
            let user = sign_in(ledger, &auth)?;
            for tx in ledger.history(&user.id, kind.into()) {
                write_transaction(out, tx)?;
            }
        }
        Command::Team(auth) => {
            let user = sign_in(ledger, &auth)?;
            let team = ledger.direct_referrals(&user.id)?;
            writeln!(
                out,
                "{} direct referrals (level A {}%)",
                team.len(),
                ledger.config().referral_rates.a * rust_decimal::Decimal::ONE_HUNDRED
            )?;
            for member in team {
                writeln!(
                    out,
                    "{}  joined {}",
                    member.phone_number,
                    member.registration_date.format("%Y-%m-%d")
                )?;
            }
        }
        Command::Investments(auth) => {
            let user = sign_in(ledger, &auth)?;
            let now = ledger.now();
            for investment in ledger.investments_for(&user.id) {
                writeln!(
                    out,
                    "{}  {:<4}  {:>6}  daily {:>5}  {} until {}",
                    investment.id,
                    investment.plan_id,
                    investment.amount,
                    investment.daily_profit,
                    if investment.is_active_at(now) {
                        "active"
                    } else {
                        "ended"
                    },
                    investment.expiry_date.format("%Y-%m-%d")
                )?;
            }
        }
        Command::Pending(auth) => {
            sign_in_admin(ledger, &auth)?;
            for tx in ledger.pending_transactions() {
                write_transaction(out, tx)?;
            }
        }
        Command::Approve { auth, tx } => {
            sign_in_admin(ledger, &auth)?;
            let tx = ledger.approve_transaction(&tx)?;
            writeln!(out, "Approved {} {} of {}.", tx.kind, tx.id, tx.amount)?;
        }
        Command::Reject { auth, tx } => {
            sign_in_admin(ledger, &auth)?;
            let tx = ledger.reject_transaction(&tx)?;
            writeln!(out, "Rejected {} {} of {}.", tx.kind, tx.id, tx.amount)?;
        }
        Command::Dashboard(auth) => {
            sign_in_admin(ledger, &auth)?;
            let dashboard = ledger.dashboard();
            writeln!(out, "users:   {}", dashboard.user_count)?;
            writeln!(out, "pending: {}", dashboard.pending_count)?;
        }
        Command::ExportUsers(auth) => {
            sign_in_admin(ledger, &auth)?;
            write_users_csv(ledger.users(), out)?;
        }
        Command::ExportTransactions(auth) => {
            sign_in_admin(ledger, &auth)?;
            write_transactions_csv(ledger.transactions(), out)?;
        }
    }
    Ok(())
}
