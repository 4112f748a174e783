//! # scoring — wallet risk model
//!
//! Scores run 1..=10, low is better.  The current model is a mock: a uniform
//! draw.  A real model would look at the wallet's transaction history.

use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Low,
    Medium,
    High,
}

impl Category {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=3 => Category::Low,
            4..=7 => Category::Medium,
            _ => Category::High,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Low => write!(f, "Low"),
            Category::Medium => write!(f, "Medium"),
            Category::High => write!(f, "High"),
        }
    }
}

/// Body of `GET /get-risk-score`.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub score:         u8,
    pub category:      Category,
    pub explanation:   String,
    pub wallet:        String,
    pub model_version: String,
}

pub fn assess<R: Rng + ?Sized>(wallet: &str, model_version: &str, rng: &mut R) -> RiskReport {
    let score: u8 = rng.gen_range(1..=10);
    let category = Category::for_score(score);

    RiskReport {
        score,
        category,
        explanation:   format!("Risk score: {score}/10 ({category})"),
        wallet:        wallet.to_string(),
        model_version: model_version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn category_bands() {
        assert_eq!(Category::for_score(1), Category::Low);
        assert_eq!(Category::for_score(3), Category::Low);
        assert_eq!(Category::for_score(4), Category::Medium);
        assert_eq!(Category::for_score(7), Category::Medium);
        assert_eq!(Category::for_score(8), Category::High);
        assert_eq!(Category::for_score(10), Category::High);
    }

    #[test]
    fn scores_stay_in_range_and_explain_themselves() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let report = assess("0xABCD", "mock-v1.0", &mut rng);
            assert!((1..=10).contains(&report.score));
            assert_eq!(report.category, Category::for_score(report.score));
            assert_eq!(
                report.explanation,
                format!("Risk score: {}/10 ({})", report.score, report.category)
            );
            assert_eq!(report.wallet, "0xABCD");
        }
    }
}
