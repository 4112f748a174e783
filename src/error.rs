//! # error
//!
//! Error taxonomy for the whole client.
//!
//! * [`GatewayError`] — what the Settlement Gateway client can report.
//! * [`LoanError`]    — what an orchestrator operation can report.  Its
//!   `Display` is the human status text shown to the user.
//! * [`AppError`]     — HTTP wrapper; Axum's `IntoResponse` impl turns it into
//!   a structured JSON body so the front end always gets a machine-readable
//!   answer even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ─── Gateway ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Wallet connect rejected by the provider or the provider unreachable.
    #[error("wallet connection failed: {0}")]
    ConnectionFailed(String),

    /// The relay answered and reported failure.  Terminal for this attempt.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// No usable response (unreachable, timed out, upstream unavailable).
    #[error("network error: {0}")]
    Network(String),
}

impl GatewayError {
    /// Only a missing response is worth re-trying; a rejection will not change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }
}

// ─── Loan operations ──────────────────────────────────────────────────────────

/// Business refusal of a borrow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    /// Policy refusal; no transaction was attempted.
    #[error("high risk (score {score}/10, threshold {threshold})")]
    HighRisk { score: u8, threshold: u8 },

    /// The relay answered the borrow transaction with a failure.
    #[error("rejected by gateway: {0}")]
    GatewayRejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway rejected the request: {0}")]
    GatewayRejected(String),

    #[error("Loan denied: {0}")]
    Denied(Denial),

    /// Bad input or an operation invoked in the wrong session state.
    #[error("Invalid request: {0}")]
    Validation(String),
}

impl LoanError {
    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            LoanError::ConnectionFailed(_) => "CONNECTION_FAILED",
            LoanError::Network(_) => "NETWORK_ERROR",
            LoanError::GatewayRejected(_) => "GATEWAY_REJECTED",
            LoanError::Denied(Denial::HighRisk { .. }) => "DENIED_HIGH_RISK",
            LoanError::Denied(Denial::GatewayRejected(_)) => "DENIED_GATEWAY_REJECTED",
            LoanError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, LoanError::Network(_))
    }
}

impl From<GatewayError> for LoanError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ConnectionFailed(msg) => LoanError::ConnectionFailed(msg),
            GatewayError::Rejected(msg) => LoanError::GatewayRejected(msg),
            GatewayError::Network(msg) => LoanError::Network(msg),
        }
    }
}

// ─── HTTP ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Loan(#[from] LoanError),
}

impl AppError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Loan(err) => {
                let status = match err {
                    LoanError::Validation(_) => StatusCode::BAD_REQUEST,
                    LoanError::Denied(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    LoanError::ConnectionFailed(_) | LoanError::GatewayRejected(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                    LoanError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
                };
                (status, err.kind())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        let body = Json(json!({
            "ok":     false,
            "error":  kind,
            "status": self.to_string(),
        }));

        (status, body).into_response()
    }
}
