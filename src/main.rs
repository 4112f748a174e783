//! # lendr — Loan Orchestration Client
//!
//! ## Environment Variables
//!
//! | Variable              | Default                        | Description                         |
//! |-----------------------|--------------------------------|-------------------------------------|
//! | `BIND_ADDR`           | `0.0.0.0:3000`                 | Address Axum listens on             |
//! | `API_KEY`             | —                              | `X-API-Key` required when set       |
//! | `GATEWAY_URL`         | `https://api.verbwire.com/v1`  | Wallet / transaction relay          |
//! | `GATEWAY_API_KEY`     | **required**                   | Bearer token for the relay          |
//! | `CONTRACT_ADDRESS`    | **required**                   | Deployed lending contract           |
//! | `GATEWAY_TIMEOUT_MS`  | `10000`                        | Relay call timeout                  |
//! | `ORACLE_URL`          | `http://localhost:5000`        | Risk oracle                         |
//! | `ORACLE_TIMEOUT_MS`   | `3000`                         | Oracle call timeout                 |
//! | `RISK_FALLBACK_SCORE` | `3`                            | Score used when the oracle degrades |
//! | `RISK_THRESHOLD`      | `5`                            | Highest approved score (inclusive)  |
//! | `COLLATERAL_SYMBOL`   | `BDAG`                         | Collateral currency                 |
//! | `LOAN_SYMBOL`         | `USDC`                         | Loan currency                       |
//! | `RUST_LOG`            | `lendr=debug`                  | Tracing filter                      |

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lendr::{
    routes::router, state::build_state, Config, HttpRiskOracle, LoanOrchestrator, RelayGateway,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional — CI/prod can use real env vars) ──────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("lendr=debug".parse()?)
                .add_directive("tower_http=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════╗
  ║        LENDR — Loan Orchestration Client      ║
  ║   Wallet · Collateral · Risk Gate · Borrow    ║
  ╚═══════════════════════════════════════════════╝"#);

    // ── 3. Config ─────────────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;

    info!(
        gateway   = %config.gateway.base_url,
        contract  = %config.gateway.contract_address,
        oracle    = %config.oracle.base_url,
        threshold = config.policy.risk_threshold,
        fallback  = config.oracle.fallback_score,
        auth      = config.api_key.is_some(),
        "Configuration loaded"
    );

    // ── 4. Clients + orchestrator ─────────────────────────────────────────────
    // one reqwest Client shared by both clients (connection pooling)
    let http = reqwest::Client::new();
    let gateway = Arc::new(RelayGateway::new(http.clone(), config.gateway.clone()));
    let oracle = Arc::new(HttpRiskOracle::new(http, config.oracle.clone()));
    let orchestrator = LoanOrchestrator::new(
        gateway,
        oracle,
        config.gateway.contract_address.clone(),
        config.policy.clone(),
    );

    // ── 5. Router ─────────────────────────────────────────────────────────────
    let app = router(build_state(orchestrator, config.api_key.clone()));

    // ── 6. Bind & Serve ───────────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "🚀 Lendr adapter starting");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
