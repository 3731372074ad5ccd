use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::types::TransactionKind;

/// Investment ledger: accounts, deposits, plans, spins and admin review
#[derive(Parser, Debug)]
#[command(name = "invest-ledger")]
#[command(about = "Investment ledger with admin-reviewed deposits and withdrawals", long_about = None)]
pub struct CliArgs {
    /// Directory holding the persisted collections
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "ledger-data",
        global = true
    )]
    pub data_dir: PathBuf,

    /// TOML file overriding the default business constants
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Phone and password of the acting user
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Phone number, with or without country prefix
    #[arg(long, value_name = "PHONE")]
    pub phone: String,

    #[arg(long, value_name = "PASSWORD")]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register {
        /// Local phone number without country prefix
        #[arg(long, value_name = "DIGITS")]
        phone: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Referral code of the user who invited you
        #[arg(long = "referral", value_name = "CODE")]
        referral: Option<String>,
    },
    /// Check credentials and show the account
    Login(Credentials),
    /// Claim the daily bonus
    CheckIn(Credentials),
    /// Submit a deposit for admin review
    Deposit {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long, value_name = "AMOUNT")]
        amount: Decimal,
        /// Payment proof (reference or data URL)
        #[arg(long, value_name = "PAYLOAD")]
        screenshot: String,
    },
    /// Request a withdrawal; without --confirm only the draft is shown
    Withdraw {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long, value_name = "AMOUNT")]
        amount: Decimal,
        #[arg(long, value_name = "NAME")]
        bank: String,
        #[arg(long, value_name = "NAME")]
        holder: String,
        #[arg(long, value_name = "NUMBER")]
        account: String,
        /// Commit the withdrawal
        #[arg(long)]
        confirm: bool,
    },
    /// List the investment plans
    Plans,
    /// Show customer support and community links
    Support,
    /// Buy an investment plan
    Invest {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long, value_name = "PLAN_ID")]
        plan: String,
    },
    /// Spin the reward wheel
    Spin(Credentials),
    /// Show your transactions of one kind
    History {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long, value_enum, default_value = "deposit")]
        kind: HistoryKind,
    },
    /// Show users you referred
    Team(Credentials),
    /// Show your investments
    Investments(Credentials),
    /// List transactions awaiting review (admin)
    Pending(Credentials),
    /// Approve a pending transaction (admin)
    Approve {
        #[command(flatten)]
        auth: Credentials,
        #[arg(value_name = "TX_ID")]
        tx: String,
    },
    /// Reject a pending transaction (admin)
    Reject {
        #[command(flatten)]
        auth: Credentials,
        #[arg(value_name = "TX_ID")]
        tx: String,
    },
    /// Show user and pending counts (admin)
    Dashboard(Credentials),
    /// Export all users as CSV (admin)
    ExportUsers(Credentials),
    /// Export all transactions as CSV (admin)
    ExportTransactions(Credentials),
}

/// Transaction kinds selectable in the history view
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HistoryKind {
    Deposit,
    Withdraw,
    CheckIn,
    Spin,
}

impl From<HistoryKind> for TransactionKind {
    fn from(kind: HistoryKind) -> Self {
        match kind {
            HistoryKind::Deposit => TransactionKind::Deposit,
            HistoryKind::Withdraw => TransactionKind::Withdraw,
            HistoryKind::CheckIn => TransactionKind::CheckIn,
            HistoryKind::Spin => TransactionKind::Spin,
        }
    }
}
