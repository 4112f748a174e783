//! # lendr-oracle — Risk Oracle Service
//!
//! Answers `GET /get-risk-score?wallet=<address>` for the Lendr client.
//!
//! ```text
//! { "score": 3, "category": "Low", "explanation": "Risk score: 3/10 (Low)",
//!   "wallet": "0x…", "model_version": "mock-v1.0" }
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod routes;
mod scoring;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("lendr_oracle=debug".parse()?))
        .init();

    let config = Config::from_env().context("Failed to load config")?;

    info!(
        addr          = ?config.bind_addr,
        model_version = %config.model_version,
        "🚀 Risk oracle starting"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, routes::router(Arc::new(config))).await?;

    Ok(())
}
