//! # models::session
//!
//! [`WalletSession`] — created when the relay confirms a wallet connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A connected wallet as reported by the Settlement Gateway.
///
/// Owned exclusively by the orchestrator; `None` there means Disconnected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSession {
    /// Local identifier, stable for as long as the session lives.
    pub session_id:   Uuid,
    /// Wallet address returned by the relay, e.g. `"0xABCD"`.
    pub address:      String,
    pub connected_at: DateTime<Utc>,
}

impl WalletSession {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            session_id:   Uuid::new_v4(),
            address:      address.into(),
            connected_at: Utc::now(),
        }
    }
}
