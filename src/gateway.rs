//! # gateway
//!
//! **Settlement Gateway Client** — talks to the wallet / transaction relay,
//! which signs, broadcasts and reads the chain on the user's behalf.
//!
//! ## Relay API Contract
//! ```text
//! POST /wallet/connect     → { "success": true, "walletAddress": "0x…" }
//! POST /transaction/send   { contractAddress, functionName, functionArgs[] }
//!                          → { "success": true, "txHash": "0x…" }
//! POST /contract/read      { contractAddress, functionName, functionArgs[] }
//!                          → { "success": true, "result": "100" }
//! ```
//! Every call carries `Authorization: Bearer <GATEWAY_API_KEY>`.
//!
//! ## Failure classes
//! * no response / timeout / HTTP 502-504 → [`GatewayError::Network`] (retryable)
//! * response with `success: false`, or any other HTTP error → [`GatewayError::Rejected`]
//! * connect failures of any kind → [`GatewayError::ConnectionFailed`]
//!
//! Nothing here retries. Retrying is the user's call.

use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::WalletSession;

// ─── Request / Response ───────────────────────────────────────────────────────

/// One invocation of a contract function through the relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub contract_address: String,
    /// Solidity signature, e.g. `"borrow(uint256,uint8)"`
    pub function_name:    String,
    pub function_args:    Vec<Value>,
}

impl ContractCall {
    pub fn new(
        contract_address: impl Into<String>,
        function_name: impl Into<String>,
        function_args: Vec<Value>,
    ) -> Self {
        Self {
            contract_address: contract_address.into(),
            function_name:    function_name.into(),
            function_args,
        }
    }
}

/// Acknowledgement of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub function_name: String,
    pub tx_hash:       Option<String>,
    pub sent_at:       DateTime<Utc>,
}

/// Result of a read-only contract query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub query:   String,
    pub result:  Value,
    pub read_at: DateTime<Utc>,
}

impl StateSnapshot {
    pub fn new(query: impl Into<String>, result: Value) -> Self {
        Self {
            query:   query.into(),
            result,
            read_at: Utc::now(),
        }
    }

    /// Interpret the result as an exact decimal (string or JSON number).
    pub fn decimal(&self) -> Result<BigDecimal, GatewayError> {
        let raw = match &self.result {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(GatewayError::Rejected(format!(
                    "{} returned a non-numeric result: {other}",
                    self.query
                )))
            }
        };
        BigDecimal::from_str(&raw).map_err(|_| {
            GatewayError::Rejected(format!("{} returned an unparseable amount: {raw}", self.query))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectResponse {
    #[serde(default)]
    success:        bool,
    wallet_address: Option<String>,
    error:          Option<String>,
    message:        Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    #[serde(default)]
    success: bool,
    tx_hash: Option<String>,
    error:   Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    success: bool,
    result:  Option<Value>,
    error:   Option<String>,
    message: Option<String>,
}

/// The provider's own words, when it gave any.
fn provider_reason(error: Option<String>, message: Option<String>, default: &str) -> String {
    error
        .or(message)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

// ─── Trait ────────────────────────────────────────────────────────────────────

/// Everything the orchestrator needs from the settlement layer.
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    async fn connect(&self) -> Result<WalletSession, GatewayError>;

    async fn send_transaction(&self, call: &ContractCall) -> Result<TxReceipt, GatewayError>;

    /// Real chain read. Never answered from local state.
    async fn query_state(&self, call: &ContractCall) -> Result<StateSnapshot, GatewayError>;
}

// ─── HTTP Relay ───────────────────────────────────────────────────────────────

/// [`SettlementGateway`] over the relay's HTTP API.
pub struct RelayGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl RelayGateway {
    pub fn new(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn classify_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Network(format!("relay timed out after {:?}", self.config.timeout))
        } else {
            GatewayError::Network(format!("relay unreachable: {e}"))
        }
    }

    /// POST a contract call and decode the JSON body.
    async fn post_call<T: DeserializeOwned>(
        &self,
        path: &str,
        call: &ContractCall,
    ) -> Result<T, GatewayError> {
        let url = self.url(path);

        // ── HTTP POST ─────────────────────────────────────────────────────────
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(call)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "Relay unreachable");
                self.classify_send_error(e)
            })?;

        // ── HTTP Status ───────────────────────────────────────────────────────
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(http_status = %status, body = %body, "Relay returned HTTP error");
            return Err(match status {
                StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT => {
                    GatewayError::Network(format!("relay unavailable: HTTP {status}"))
                }
                _ => GatewayError::Rejected(format!("HTTP {status}: {body}")),
            });
        }

        // ── Parse ─────────────────────────────────────────────────────────────
        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Relay response parse failed");
            if e.is_timeout() {
                self.classify_send_error(e)
            } else {
                GatewayError::Rejected(format!("unreadable relay response: {e}"))
            }
        })
    }
}

#[async_trait]
impl SettlementGateway for RelayGateway {
    async fn connect(&self) -> Result<WalletSession, GatewayError> {
        let url = self.url("/wallet/connect");
        info!(url = %url, "🔗 [GATEWAY] Connecting wallet");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Wallet provider unreachable");
                GatewayError::ConnectionFailed(format!("wallet provider unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(http_status = %status, body = %body, "Wallet connect refused");
            return Err(GatewayError::ConnectionFailed(format!("HTTP {status}: {body}")));
        }

        let data: ConnectResponse = response.json().await.map_err(|e| {
            GatewayError::ConnectionFailed(format!("unreadable connect response: {e}"))
        })?;

        if !data.success {
            let reason = provider_reason(data.error, data.message, "provider reported failure");
            warn!(reason = %reason, "Wallet connect rejected by provider");
            return Err(GatewayError::ConnectionFailed(reason));
        }

        let address = data
            .wallet_address
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::ConnectionFailed("provider returned no wallet address".into())
            })?;

        info!(wallet = %address, "✅ [GATEWAY] Wallet connected");
        Ok(WalletSession::new(address))
    }

    async fn send_transaction(&self, call: &ContractCall) -> Result<TxReceipt, GatewayError> {
        info!(
            contract = %call.contract_address,
            function = %call.function_name,
            args     = ?call.function_args,
            "🚀 [GATEWAY] Sending transaction"
        );

        let data: SendResponse = self.post_call("/transaction/send", call).await?;

        if !data.success {
            let reason = provider_reason(data.error, data.message, "relay reported failure");
            warn!(function = %call.function_name, reason = %reason, "Transaction rejected");
            return Err(GatewayError::Rejected(reason));
        }

        info!(tx_hash = ?data.tx_hash, "✅ [GATEWAY] Transaction accepted");

        Ok(TxReceipt {
            function_name: call.function_name.clone(),
            tx_hash:       data.tx_hash,
            sent_at:       Utc::now(),
        })
    }

    async fn query_state(&self, call: &ContractCall) -> Result<StateSnapshot, GatewayError> {
        let data: ReadResponse = self.post_call("/contract/read", call).await?;

        if !data.success {
            let reason = provider_reason(data.error, data.message, "read failed");
            warn!(query = %call.function_name, reason = %reason, "Contract read rejected");
            return Err(GatewayError::Rejected(reason));
        }

        let result = data.result.ok_or_else(|| {
            GatewayError::Rejected(format!("{} returned no result", call.function_name))
        })?;

        info!(query = %call.function_name, result = %result, "📖 [GATEWAY] Contract read");
        Ok(StateSnapshot::new(call.function_name.clone(), result))
    }
}
