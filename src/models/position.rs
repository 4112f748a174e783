//! # models::position
//!
//! Client-side view of on-chain positions.
//!
//! * `CollateralPosition` — collateral the contract confirms for the wallet
//! * `LoanPosition`       — outstanding principal the contract confirms
//!
//! Both are only ever built from values read back through the Settlement
//! Gateway, never from the amount the user asked for.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── CollateralPosition ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralPosition {
    pub amount:       BigDecimal,
    /// e.g. `"BDAG"`
    pub currency:     String,
    pub confirmed_at: DateTime<Utc>,
}

impl CollateralPosition {
    pub fn confirmed(amount: BigDecimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency:     currency.into(),
            confirmed_at: Utc::now(),
        }
    }

    /// Non-zero collateral is what makes a session eligible to borrow.
    pub fn is_collateralized(&self) -> bool {
        self.amount > BigDecimal::from(0)
    }
}

// ─── LoanPosition ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPosition {
    pub principal:              BigDecimal,
    /// e.g. `"USDC"`
    pub currency:               String,
    /// Score of the assessment that cleared the most recent borrow.
    pub risk_score_at_issuance: u8,
    pub confirmed_at:           DateTime<Utc>,
}

impl LoanPosition {
    pub fn confirmed(principal: BigDecimal, currency: impl Into<String>, risk_score: u8) -> Self {
        Self {
            principal,
            currency:               currency.into(),
            risk_score_at_issuance: risk_score,
            confirmed_at:           Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_collateral_is_not_collateralized() {
        let pos = CollateralPosition::confirmed(BigDecimal::from(0), "BDAG");
        assert!(!pos.is_collateralized());

        let pos = CollateralPosition::confirmed(BigDecimal::from(100), "BDAG");
        assert!(pos.is_collateralized());
    }
}
