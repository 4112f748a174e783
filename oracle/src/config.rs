//! # config — read Config from environment variables

use std::net::SocketAddr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the oracle listens
    pub bind_addr:     SocketAddr,
    /// Reported in every answer and on `/health`
    pub model_version: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("ORACLE_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .context("ORACLE_BIND_ADDR must be a socket address like 0.0.0.0:5000")?;

        Ok(Self {
            bind_addr,
            model_version: std::env::var("ORACLE_MODEL_VERSION")
                .unwrap_or_else(|_| "mock-v1.0".to_string()),
        })
    }
}
