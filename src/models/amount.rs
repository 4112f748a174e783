//! # models::amount
//!
//! [`Amount`] — a strictly positive decimal requested by the user.
//!
//! Amounts are kept as [`BigDecimal`] end to end so the value that reaches the
//! relay is exactly the value the user typed. No `f64` anywhere on this path.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::error::LoanError;

/// A validated, strictly positive amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Wrap a decimal, rejecting zero and negative values.
    pub fn new(value: BigDecimal) -> Result<Self, LoanError> {
        if value <= BigDecimal::from(0) {
            return Err(LoanError::Validation(format!(
                "amount must be greater than zero (got {value})"
            )));
        }
        Ok(Self(value))
    }

    /// Validate an optional amount coming from a user intent.
    pub fn required(value: Option<BigDecimal>) -> Result<Self, LoanError> {
        match value {
            Some(v) => Self::new(v),
            None => Err(LoanError::Validation("amount is required".into())),
        }
    }
}

impl FromStr for Amount {
    type Err = LoanError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoanError::Validation("amount is required".into()));
        }
        let value = BigDecimal::from_str(trimmed)
            .map_err(|_| LoanError::Validation(format!("'{trimmed}' is not a valid amount")))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
