//! Ledger configuration
//!
//! All business constants live in [`LedgerConfig`]. Defaults reproduce the
//! platform's published terms; a TOML file may override any subset of them.
//!
//! ```toml
//! min_withdraw = 500
//! withdraw_fee = 0.1
//!
//! [wheel]
//! settle_delay_ms = 0
//! ```

use crate::types::{BankDetails, InvestmentPlan, LedgerError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Referral bonus percentages by level
///
/// Only level A is tied to a ledger effect (the referral spin credit); levels
/// B and C are published figures with no effect.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReferralRates {
    pub a: Decimal,
    pub b: Decimal,
    pub c: Decimal,
}

impl Default for ReferralRates {
    fn default() -> Self {
        ReferralRates {
            a: Decimal::new(25, 2),
            b: Decimal::new(4, 2),
            c: Decimal::new(3, 2),
        }
    }
}

/// Reward wheel layout and timing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Segment rewards in clockwise order
    pub rewards: Vec<Decimal>,
    /// Whole turns before the wheel lands
    pub full_turns: u32,
    /// Delay between starting a spin and crediting the reward
    pub settle_delay_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        WheelConfig {
            rewards: [50, 100, 150, 200, 250, 300]
                .into_iter()
                .map(Decimal::from)
                .collect(),
            full_turns: 10,
            settle_delay_ms: 5200,
        }
    }
}

impl WheelConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Outbound support references, displayed only
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SupportLinks {
    pub customer_support: String,
    pub community_group: String,
}

impl Default for SupportLinks {
    fn default() -> Self {
        SupportLinks {
            customer_support: "@support".to_string(),
            community_group: "https://example.com/community".to_string(),
        }
    }
}

/// Configuration for the ledger
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub min_withdraw: Decimal,
    /// Fraction withheld from a withdrawal, in `[0, 1)`
    pub withdraw_fee: Decimal,
    pub referral_rates: ReferralRates,
    /// Deposit amount at which the referrer earns a spin credit
    pub referral_spin_threshold: Decimal,
    pub daily_check_in_bonus: Decimal,
    pub welcome_bonus: Decimal,
    /// Country prefix prepended to local numbers
    pub phone_prefix: String,
    /// Required length of a local phone number
    pub phone_digits: usize,
    /// Local number that registers as an admin
    pub admin_phone: String,
    /// Lifetime of a purchased investment
    pub investment_term_days: i64,
    /// Quick-pick amounts offered on the deposit screen
    pub deposit_presets: Vec<Decimal>,
    /// Account deposits are sent to
    pub receiving_bank: BankDetails,
    pub support: SupportLinks,
    pub wheel: WheelConfig,
    pub plans: Vec<InvestmentPlan>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            min_withdraw: Decimal::from(400),
            withdraw_fee: Decimal::new(20, 2),
            referral_rates: ReferralRates::default(),
            referral_spin_threshold: Decimal::from(1000),
            daily_check_in_bonus: Decimal::from(10),
            welcome_bonus: Decimal::from(100),
            phone_prefix: "+977".to_string(),
            phone_digits: 10,
            admin_phone: "9800000000".to_string(),
            investment_term_days: 100,
            deposit_presets: [1000, 2000, 3000, 4000, 5000, 6000, 10000]
                .into_iter()
                .map(Decimal::from)
                .collect(),
            receiving_bank: BankDetails {
                bank_name: "Receiving Bank".to_string(),
                account_holder: "Platform Treasury".to_string(),
                account_number: "0000000000".to_string(),
            },
            support: SupportLinks::default(),
            wheel: WheelConfig::default(),
            plans: (1..=10).map(InvestmentPlan::tier).collect(),
        }
    }
}

impl LedgerConfig {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, LedgerError> {
        let config: LedgerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, or the defaults when `path` does not exist
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges the ledger relies on
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.withdraw_fee < Decimal::ZERO || self.withdraw_fee >= Decimal::ONE {
            return Err(LedgerError::config(format!(
                "withdraw_fee must be in [0, 1), got {}",
                self.withdraw_fee
            )));
        }
        if self.wheel.rewards.is_empty() {
            return Err(LedgerError::config("wheel.rewards must not be empty"));
        }
        if self.phone_digits == 0 {
            return Err(LedgerError::config("phone_digits must be positive"));
        }
        if self.investment_term_days <= 0 {
            return Err(LedgerError::config("investment_term_days must be positive"));
        }
        for (name, value) in [
            ("min_withdraw", self.min_withdraw),
            ("daily_check_in_bonus", self.daily_check_in_bonus),
            ("welcome_bonus", self.welcome_bonus),
            ("referral_spin_threshold", self.referral_spin_threshold),
        ] {
            if value < Decimal::ZERO {
                return Err(LedgerError::config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Canonical form of a local phone number
    pub fn canonical_phone(&self, phone_digits: &str) -> String {
        format!("{} {}", self.phone_prefix, phone_digits)
    }

    /// Net payout recorded for a gross withdrawal of `amount`
    pub fn net_withdrawal(&self, amount: Decimal) -> Decimal {
        amount * (Decimal::ONE - self.withdraw_fee)
    }

    pub fn plan(&self, plan_id: &str) -> Option<&InvestmentPlan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}
