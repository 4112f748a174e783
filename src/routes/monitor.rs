//! # routes::monitor
//!
//! Status stream for the display surface, plus liveness.
//!
//! `ws://host/ws/status` sends a `SNAPSHOT` frame on connect, then every
//! [`StatusUpdate`](crate::events::StatusUpdate) as a JSON text frame.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::state::SharedState;

// ─── GET /health ──────────────────────────────────────────────────────────────

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "ok":      true,
        "service": "lendr",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ─── WebSocket Handler ────────────────────────────────────────────────────────

pub async fn ws_status(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Current session as a `SNAPSHOT` frame.
async fn snapshot_frame(state: &SharedState) -> String {
    let orch = state.orchestrator.lock().await;
    json!({
        "event":   "SNAPSHOT",
        "session": orch.snapshot(),
    })
    .to_string()
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    // subscribe before snapshotting so nothing falls in between
    let mut rx = state.broadcast_tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!("🔌 Status client connected");

    if sender.send(Message::Text(snapshot_frame(&state).await)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(frame) => {
                    if sender.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                // Missed updates would leave the display stale: resync it.
                Err(RecvError::Lagged(missed)) => {
                    debug!(missed, "Status client fell behind, resending snapshot");
                    if sender.send(Message::Text(snapshot_frame(&state).await)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },

            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(Message::Ping(data))) => {
                    let _ = sender.send(Message::Pong(data)).await;
                }
                // the stream is one-way; client text is ignored
                Some(Ok(_)) => {}
            },
        }
    }

    info!("🔌 Status client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::{GatewayConfig, LoanPolicy, OracleConfig};
    use crate::state::build_state;
    use crate::{HttpRiskOracle, LoanOrchestrator, RelayGateway};

    #[tokio::test]
    async fn snapshot_frame_describes_a_fresh_session() {
        let client = reqwest::Client::new();
        let gateway = RelayGateway::new(
            client.clone(),
            GatewayConfig {
                base_url:         "http://127.0.0.1:1".into(),
                api_key:          "k".into(),
                contract_address: "0xLEND".into(),
                timeout:          Duration::from_millis(100),
            },
        );
        let oracle = HttpRiskOracle::new(
            client,
            OracleConfig {
                base_url:       "http://127.0.0.1:1".into(),
                timeout:        Duration::from_millis(100),
                fallback_score: 3,
            },
        );
        let orch = LoanOrchestrator::new(Arc::new(gateway), Arc::new(oracle), "0xLEND", LoanPolicy::default());
        let state = build_state(orch, None);

        let frame: serde_json::Value = serde_json::from_str(&snapshot_frame(&state).await).unwrap();

        assert_eq!(frame["event"], "SNAPSHOT");
        assert_eq!(frame["session"]["connected"], false);
        assert_eq!(frame["session"]["loan"], serde_json::Value::Null);
    }
}
