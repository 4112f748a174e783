//! # Lendr — Loan Orchestration Client
//!
//! ```text
//!  ┌──────────────┐  POST /api/*   ┌──────────────────────────┐  POST /wallet/connect
//!  │  Front end   │ ─────────────▶ │ AppState                 │  POST /transaction/send
//!  │  (display)   │ ◀───────────── │ └─ Mutex<LoanOrchestrator>│ ──────────────▶ Relay
//!  └──────────────┘  ws /ws/status │    ├─ SettlementGateway  │  POST /contract/read
//!                                  │    └─ RiskOracle ────────┼──▶ GET /get-risk-score
//!                                  └──────────────────────────┘
//! ```
//!
//! The orchestrator is usable on its own (no HTTP needed); the `routes`,
//! `state`, `auth` and `events` modules are the thin adapter around it.

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod models;
pub mod oracle;
pub mod orchestrator;
pub mod routes;
pub mod state;

pub use config::{Config, GatewayConfig, LoanPolicy, OracleConfig};
pub use error::{Denial, GatewayError, LoanError};
pub use gateway::{ContractCall, RelayGateway, SettlementGateway, StateSnapshot, TxReceipt};
pub use oracle::{HttpRiskOracle, RiskOracle};
pub use orchestrator::{BorrowReceipt, DepositReceipt, LoanOrchestrator, SessionSnapshot};
