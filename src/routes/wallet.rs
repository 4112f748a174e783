//! # routes::wallet
//!
//! Wallet / session intents.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::AppError, events::StatusEvent, state::SharedState};

// ─── POST /api/wallet/connect ─────────────────────────────────────────────────

pub async fn connect(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let mut orch = state.orchestrator.lock().await;

    let session = orch
        .connect()
        .await
        .map_err(|e| state.report_failure("connect", e))?;

    let update = state.publish(StatusEvent::WalletConnected {
        wallet: session.address.clone(),
    });

    Ok(Json(json!({
        "ok":      true,
        "status":  update.status,
        "session": orch.snapshot(),
    })))
}

// ─── POST /api/wallet/disconnect ──────────────────────────────────────────────

pub async fn disconnect(State(state): State<SharedState>) -> impl IntoResponse {
    let mut orch = state.orchestrator.lock().await;
    orch.disconnect();

    let update = state.publish(StatusEvent::WalletDisconnected);

    Json(json!({
        "ok":      true,
        "status":  update.status,
        "session": orch.snapshot(),
    }))
}

// ─── GET /api/session ─────────────────────────────────────────────────────────

pub async fn get_session(State(state): State<SharedState>) -> impl IntoResponse {
    let orch = state.orchestrator.lock().await;
    Json(json!({
        "ok":      true,
        "session": orch.snapshot(),
    }))
}

// ─── POST /api/session/refresh ────────────────────────────────────────────────

pub async fn refresh(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let mut orch = state.orchestrator.lock().await;

    let snapshot = orch
        .refresh()
        .await
        .map_err(|e| state.report_failure("refresh", e))?;

    let update = state.publish(StatusEvent::SessionRefreshed {
        snapshot: snapshot.clone(),
    });

    Ok(Json(json!({
        "ok":      true,
        "status":  update.status,
        "session": snapshot,
    })))
}
