//! Investment plan catalog entries and purchased investments

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Plan identifier (`v1` .. `v10` in the default catalog)
pub type PlanId = String;

/// Investment identifier (7-char base-36 token)
pub type InvestmentId = String;

/// Static catalog entry
///
/// Plans are part of the configuration and never persisted in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPlan {
    pub id: PlanId,
    pub name: String,
    pub price: Decimal,
    pub daily_profit: Decimal,
    /// Advertised duration in days. Purchases use the fixed investment term instead.
    pub duration: u32,
    /// Nominal percentage return label
    pub returns: u32,
}

impl InvestmentPlan {
    /// Tier `n` of the default catalog: price 1000·n, daily profit 150·n
    pub fn tier(n: u32) -> Self {
        let n_dec = Decimal::from(n);
        InvestmentPlan {
            id: format!("v{}", n),
            name: format!("VIP {}", n),
            price: Decimal::from(1000) * n_dec,
            daily_profit: Decimal::from(150) * n_dec,
            duration: 100,
            returns: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Active,
    Expired,
}

/// One user's purchase of one plan
///
/// `amount` and `daily_profit` are copied from the plan at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInvestment {
    pub id: InvestmentId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub amount: Decimal,
    pub daily_profit: Decimal,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    /// Written once at purchase; nothing transitions it afterwards
    pub status: InvestmentStatus,
}

impl UserInvestment {
    /// Whether `now` still falls inside the investment window
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == InvestmentStatus::Active && now < self.expiry_date
    }
}
