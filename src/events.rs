//! # events
//!
//! Defines [`StatusEvent`] — every outcome the adapter broadcasts over
//! WebSocket to whatever is rendering the session.
//!
//! Events are wrapped in a [`StatusUpdate`] carrying the human-readable status
//! line, then sent as pre-serialized JSON `String`s over the broadcast channel.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::LoanError;
use crate::models::{CollateralPosition, LoanPosition, RiskSource};
use crate::orchestrator::SessionSnapshot;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusEvent {
    WalletConnected {
        wallet: String,
    },

    WalletDisconnected,

    /// Contract confirmed the new collateral total.
    CollateralDeposited {
        collateral: CollateralPosition,
        tx_hash:    Option<String>,
    },

    /// Borrow cleared the risk gate and the contract confirmed the principal.
    LoanIssued {
        loan:        LoanPosition,
        risk_score:  u8,
        risk_source: RiskSource,
        tx_hash:     Option<String>,
    },

    SessionRefreshed {
        snapshot: SessionSnapshot,
    },

    /// Any operation that ended in a [`LoanError`], denials included.
    OperationFailed {
        operation: &'static str,
        error:     &'static str,
        message:   String,
    },
}

impl StatusEvent {
    pub fn failed(operation: &'static str, err: &LoanError) -> Self {
        StatusEvent::OperationFailed {
            operation,
            error:   err.kind(),
            message: err.to_string(),
        }
    }

    /// One line of text suitable for a status bar.
    pub fn status_text(&self) -> String {
        match self {
            StatusEvent::WalletConnected { wallet } => format!("Connected: {wallet}"),
            StatusEvent::WalletDisconnected => "Disconnected".to_string(),
            StatusEvent::CollateralDeposited { collateral, .. } => format!(
                "Deposit successful: collateral now {} {}",
                collateral.amount, collateral.currency
            ),
            StatusEvent::LoanIssued { loan, risk_score, .. } => format!(
                "Loan approved (risk score {risk_score}/10): outstanding {} {}",
                loan.principal, loan.currency
            ),
            StatusEvent::SessionRefreshed { .. } => "Positions refreshed".to_string(),
            StatusEvent::OperationFailed { message, .. } => message.clone(),
        }
    }
}

/// What actually goes over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    #[serde(flatten)]
    pub event:  StatusEvent,
    pub status: String,
    pub at:     DateTime<Utc>,
}

impl From<StatusEvent> for StatusUpdate {
    fn from(event: StatusEvent) -> Self {
        Self {
            status: event.status_text(),
            event,
            at: Utc::now(),
        }
    }
}

impl StatusUpdate {
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}
