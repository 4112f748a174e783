//! HTTP surface of the presentation adapter.
//!
//! | Method   | Path                      | Intent                    |
//! |----------|---------------------------|---------------------------|
//! | GET      | `/health`                 | liveness (no auth)        |
//! | POST     | `/api/wallet/connect`     | connect-clicked           |
//! | POST     | `/api/wallet/disconnect`  | disconnect                |
//! | POST     | `/api/collateral/deposit` | deposit-amount-entered    |
//! | POST     | `/api/loan/borrow`        | borrow-amount-entered     |
//! | POST     | `/api/session/refresh`    | re-read positions         |
//! | GET      | `/api/session`            | current snapshot          |
//! | GET (WS) | `/ws/status`              | status update stream      |

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth::require_api_key, state::SharedState};

pub mod lending;
pub mod monitor;
pub mod wallet;

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)   // Tighten in production!
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health",                  get(monitor::health))
        // ── Wallet ────────────────────────────────────────────────────────────
        .route("/api/wallet/connect",      post(wallet::connect))
        .route("/api/wallet/disconnect",   post(wallet::disconnect))
        // ── Lending ───────────────────────────────────────────────────────────
        .route("/api/collateral/deposit",  post(lending::deposit))
        .route("/api/loan/borrow",         post(lending::borrow))
        // ── Session ───────────────────────────────────────────────────────────
        .route("/api/session",             get(wallet::get_session))
        .route("/api/session/refresh",     post(wallet::refresh))
        .route("/ws/status",               get(monitor::ws_status))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
