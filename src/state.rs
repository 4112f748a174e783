//! # state
//!
//! Shared state for the presentation adapter.
//!
//! * `Mutex<LoanOrchestrator>` — held for the whole of an operation, so
//!   intents from the UI run strictly one after another and a borrow always
//!   sees the settled result of the deposit before it.
//! * `broadcast::Sender<String>` — status updates for WebSocket listeners.

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use crate::error::{AppError, LoanError};
use crate::events::{StatusEvent, StatusUpdate};
use crate::orchestrator::LoanOrchestrator;

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level shared state injected into every Axum handler.
pub struct AppState {
    /// The one session this adapter drives.
    pub orchestrator: Mutex<LoanOrchestrator>,

    /// Pre-serialized [`StatusUpdate`] JSON for `/ws/status` clients.
    pub broadcast_tx: broadcast::Sender<String>,

    /// Expected `X-API-Key`; `None` = dev mode.
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(orchestrator: LoanOrchestrator, api_key: Option<String>) -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);

        Self {
            orchestrator: Mutex::new(orchestrator),
            broadcast_tx,
            api_key,
        }
    }

    /// Broadcast an event and hand back what was sent.
    /// No listener is not an error.
    pub fn publish(&self, event: StatusEvent) -> StatusUpdate {
        let update = StatusUpdate::from(event);
        let _ = self.broadcast_tx.send(update.to_json());
        update
    }

    /// Broadcast a failed operation and convert it for the HTTP response.
    pub fn report_failure(&self, operation: &'static str, err: LoanError) -> AppError {
        self.publish(StatusEvent::failed(operation, &err));
        AppError::Loan(err)
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(orchestrator: LoanOrchestrator, api_key: Option<String>) -> SharedState {
    Arc::new(AppState::new(orchestrator, api_key))
}
