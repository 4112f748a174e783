//! # models::risk
//!
//! [`RiskAssessment`] — produced fresh for every borrow attempt and never
//! cached, because a wallet's risk can change between attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores live in `0..=MAX_RISK_SCORE`; lower is better.
pub const MAX_RISK_SCORE: u8 = 10;

/// Where a score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSource {
    /// Returned by the oracle.
    Live,
    /// Oracle unreachable or its answer unusable; the configured default was used.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score:       u8,
    pub source:      RiskSource,
    /// Optional human text from the oracle, e.g. `"Risk score: 3/10 (Low)"`.
    pub explanation: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn live(score: u8, explanation: Option<String>) -> Self {
        Self {
            score,
            source: RiskSource::Live,
            explanation,
            assessed_at: Utc::now(),
        }
    }

    pub fn fallback(score: u8) -> Self {
        Self {
            score,
            source: RiskSource::Fallback,
            explanation: None,
            assessed_at: Utc::now(),
        }
    }

    /// Inclusive: a score equal to the threshold is accepted.
    pub fn within(&self, threshold: u8) -> bool {
        self.score <= threshold
    }
}
