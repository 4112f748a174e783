//! # routes::lending
//!
//! Deposit and borrow intents.  The amount is validated here, before the
//! orchestrator lock is taken and long before any network call.
//!
//! Send amounts as JSON strings (`{"amount": "100.25"}`) to keep them exact;
//! plain JSON numbers are accepted and read back in their shortest decimal form.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, LoanError},
    events::StatusEvent,
    models::Amount,
    state::SharedState,
};

#[derive(Debug, Deserialize)]
pub struct AmountBody {
    pub amount: Option<Value>,
}

fn parse_amount(raw: Option<Value>) -> Result<Amount, LoanError> {
    match raw {
        None | Some(Value::Null) => Amount::required(None),
        Some(Value::String(s)) => s.parse(),
        Some(Value::Number(n)) => n.to_string().parse(),
        Some(other) => Err(LoanError::Validation(format!("'{other}' is not a valid amount"))),
    }
}

fn read_amount(
    state: &SharedState,
    operation: &'static str,
    body: Result<Json<AmountBody>, JsonRejection>,
) -> Result<Amount, AppError> {
    let raw = match body {
        Ok(Json(body)) => body.amount,
        Err(rejection) => {
            let err = LoanError::Validation(format!("unreadable request body: {}", rejection.body_text()));
            return Err(state.report_failure(operation, err));
        }
    };
    parse_amount(raw).map_err(|e| state.report_failure(operation, e))
}

// ─── POST /api/collateral/deposit ─────────────────────────────────────────────

pub async fn deposit(
    State(state): State<SharedState>,
    body: Result<Json<AmountBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let amount = read_amount(&state, "deposit", body)?;

    let mut orch = state.orchestrator.lock().await;
    let receipt = orch
        .deposit_collateral(amount)
        .await
        .map_err(|e| state.report_failure("deposit", e))?;

    let update = state.publish(StatusEvent::CollateralDeposited {
        collateral: receipt.collateral.clone(),
        tx_hash:    receipt.tx.tx_hash.clone(),
    });

    Ok(Json(json!({
        "ok":      true,
        "status":  update.status,
        "receipt": receipt,
        "session": orch.snapshot(),
    })))
}

// ─── POST /api/loan/borrow ────────────────────────────────────────────────────

pub async fn borrow(
    State(state): State<SharedState>,
    body: Result<Json<AmountBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let amount = read_amount(&state, "borrow", body)?;

    let mut orch = state.orchestrator.lock().await;
    let receipt = orch
        .borrow_loan(amount)
        .await
        .map_err(|e| state.report_failure("borrow", e))?;

    let update = state.publish(StatusEvent::LoanIssued {
        loan:        receipt.loan.clone(),
        risk_score:  receipt.assessment.score,
        risk_source: receipt.assessment.source,
        tx_hash:     receipt.tx.tx_hash.clone(),
    });

    Ok(Json(json!({
        "ok":      true,
        "status":  update.status,
        "receipt": receipt,
        "session": orch.snapshot(),
    })))
}
