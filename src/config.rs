//! # config — read configuration from environment variables
//!
//! Everything the client needs is gathered here once at start-up and injected
//! into the gateway, the oracle client and the orchestrator.  Nothing reads the
//! environment after that.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::models::MAX_RISK_SCORE;

/// Settlement Gateway (wallet / transaction relay) settings.
#[derive(Clone)]
pub struct GatewayConfig {
    /// e.g. `"https://api.verbwire.com/v1"`
    pub base_url:         String,
    /// Bearer token for the relay
    pub api_key:          String,
    /// Deployed lending contract
    pub contract_address: String,
    /// Upper bound on every relay call
    pub timeout:          Duration,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Risk Oracle settings.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url:       String,
    pub timeout:        Duration,
    /// Score used when the oracle is unreachable or answers garbage.
    pub fallback_score: u8,
}

/// Borrowing policy enforced by the orchestrator.
#[derive(Debug, Clone)]
pub struct LoanPolicy {
    /// Highest score still approved (inclusive).
    pub risk_threshold:    u8,
    pub collateral_symbol: String,
    pub loan_symbol:       String,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            risk_threshold:    5,
            collateral_symbol: "BDAG".to_string(),
            loan_symbol:       "USDC".to_string(),
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// `None` = dev mode, the adapter accepts every request.
    pub api_key:   Option<String>,
    pub gateway:   GatewayConfig,
    pub oracle:    OracleConfig,
    pub policy:    LoanPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_addr: SocketAddr = var("BIND_ADDR", "0.0.0.0:3000")
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let api_key = lookup("API_KEY").filter(|v| !v.is_empty());

        let gateway_api_key = lookup("GATEWAY_API_KEY")
            .filter(|v| !v.is_empty())
            .context("GATEWAY_API_KEY environment variable is required")?;

        let contract_address = lookup("CONTRACT_ADDRESS")
            .filter(|v| !v.is_empty())
            .context("CONTRACT_ADDRESS environment variable is required")?;

        let gateway_timeout_ms: u64 = var("GATEWAY_TIMEOUT_MS", "10000")
            .parse()
            .context("GATEWAY_TIMEOUT_MS must be a number")?;

        let oracle_timeout_ms: u64 = var("ORACLE_TIMEOUT_MS", "3000")
            .parse()
            .context("ORACLE_TIMEOUT_MS must be a number")?;

        let fallback_score = parse_score(&var("RISK_FALLBACK_SCORE", "3"), "RISK_FALLBACK_SCORE")?;
        let risk_threshold = parse_score(&var("RISK_THRESHOLD", "5"), "RISK_THRESHOLD")?;

        Ok(Self {
            bind_addr,
            api_key,
            gateway: GatewayConfig {
                base_url: trim_slash(var("GATEWAY_URL", "https://api.verbwire.com/v1")),
                api_key: gateway_api_key,
                contract_address,
                timeout: Duration::from_millis(gateway_timeout_ms),
            },
            oracle: OracleConfig {
                base_url: trim_slash(var("ORACLE_URL", "http://localhost:5000")),
                timeout: Duration::from_millis(oracle_timeout_ms),
                fallback_score,
            },
            policy: LoanPolicy {
                risk_threshold,
                collateral_symbol: var("COLLATERAL_SYMBOL", "BDAG"),
                loan_symbol:       var("LOAN_SYMBOL", "USDC"),
            },
        })
    }
}

fn parse_score(raw: &str, key: &str) -> anyhow::Result<u8> {
    let score: u8 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be an integer between 0 and {MAX_RISK_SCORE}"))?;
    if score > MAX_RISK_SCORE {
        bail!("{key} must be between 0 and {MAX_RISK_SCORE}, got {score}");
    }
    Ok(score)
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
