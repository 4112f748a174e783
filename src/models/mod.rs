//! Domain models shared across the orchestrator, the clients and the adapter.

pub mod amount;
pub mod position;
pub mod risk;
pub mod session;

pub use amount::Amount;
pub use position::{CollateralPosition, LoanPosition};
pub use risk::{RiskAssessment, RiskSource, MAX_RISK_SCORE};
pub use session::WalletSession;
