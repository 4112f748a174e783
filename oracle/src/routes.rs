//! # routes
//!
//! | Method | Path                          | Description                |
//! |--------|-------------------------------|----------------------------|
//! | GET    | `/`                           | banner                     |
//! | GET    | `/health`                     | liveness + model info      |
//! | GET    | `/get-risk-score?wallet=0x…`  | score one wallet           |

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{config::Config, scoring};

pub type SharedConfig = Arc<Config>;

pub fn router(config: SharedConfig) -> Router {
    Router::new()
        .route("/",               get(home))
        .route("/health",         get(health))
        .route("/get-risk-score", get(get_risk_score))
        .with_state(config)
}

async fn home() -> &'static str {
    "Lendr Risk Oracle"
}

async fn health(State(config): State<SharedConfig>) -> impl IntoResponse {
    Json(json!({
        "status":        "healthy",
        "model_loaded":  true,
        "model_version": config.model_version,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    wallet: Option<String>,
}

async fn get_risk_score(
    State(config): State<SharedConfig>,
    Query(query): Query<ScoreQuery>,
) -> impl IntoResponse {
    let wallet = query.wallet.unwrap_or_default().trim().to_string();

    if wallet.is_empty() {
        warn!("Risk score requested without a wallet");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Wallet address required" })),
        );
    }

    let report = scoring::assess(&wallet, &config.model_version, &mut rand::thread_rng());
    info!(wallet = %wallet, score = report.score, category = %report.category, "🎯 Risk scored");

    (StatusCode::OK, Json(json!(report)))
}
