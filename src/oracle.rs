//! # oracle — Risk Oracle Client
//!
//! `GET {ORACLE_URL}/get-risk-score?wallet=<address>` → `{ "score": 3, ... }`
//!
//! This client **never fails outward**. Unreachable oracle, timeout, HTTP
//! error, malformed body, missing or out-of-range score: all of them degrade
//! to `RiskAssessment { score: fallback_score, source: Fallback }` so a borrow
//! decision always has a score to act on.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::OracleConfig;
use crate::models::{RiskAssessment, MAX_RISK_SCORE};

#[async_trait]
pub trait RiskOracle: Send + Sync {
    async fn get_risk_score(&self, wallet_address: &str) -> RiskAssessment;
}

/// Response format from `/get-risk-score`
#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score:       Option<i64>,
    explanation: Option<String>,
}

pub struct HttpRiskOracle {
    client: reqwest::Client,
    config: OracleConfig,
}

impl HttpRiskOracle {
    pub fn new(client: reqwest::Client, config: OracleConfig) -> Self {
        Self { client, config }
    }

    async fn fetch(&self, wallet_address: &str) -> Result<RiskAssessment, String> {
        let url = format!("{}/get-risk-score", self.config.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("wallet", wallet_address)])
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| format!("oracle unreachable: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("oracle returned HTTP {}", resp.status()));
        }

        let body: ScoreResponse = resp
            .json()
            .await
            .map_err(|e| format!("malformed oracle response: {e}"))?;

        let score = body.score.ok_or("oracle response has no score")?;
        let score = u8::try_from(score)
            .ok()
            .filter(|s| *s <= MAX_RISK_SCORE)
            .ok_or_else(|| format!("score {score} outside 0..={MAX_RISK_SCORE}"))?;

        Ok(RiskAssessment::live(score, body.explanation))
    }
}

#[async_trait]
impl RiskOracle for HttpRiskOracle {
    async fn get_risk_score(&self, wallet_address: &str) -> RiskAssessment {
        match self.fetch(wallet_address).await {
            Ok(assessment) => {
                info!(wallet = %wallet_address, score = assessment.score, "🎯 Risk score received");
                assessment
            }
            Err(reason) => {
                warn!(
                    wallet   = %wallet_address,
                    reason   = %reason,
                    fallback = self.config.fallback_score,
                    "⚠️ Risk oracle degraded — using fallback score"
                );
                RiskAssessment::fallback(self.config.fallback_score)
            }
        }
    }
}
