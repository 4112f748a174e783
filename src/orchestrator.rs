//! # orchestrator — Loan Orchestrator
//!
//! Sequences wallet connection, collateral deposit, risk evaluation and loan
//! issuance against the settlement layer, and owns the client-side state.
//!
//! ## State
//! ```text
//!   session:    Option<WalletSession>       None = Disconnected
//!   collateral: Option<CollateralPosition>  Some(>0) = Collateralized
//!   loan:       Option<LoanPosition>        Some = Borrowed
//! ```
//! Collateralized and Borrowed are independent flags; a session can go through
//! any number of deposit / borrow cycles.
//!
//! ## Invariants
//! * positions are only written from values read back through
//!   [`SettlementGateway::query_state`], never from the requested amount
//! * a loan never exists without non-zero collateral
//! * a borrow whose risk score exceeds the threshold never reaches the relay
//!
//! Every operation takes `&mut self`, so one orchestrator runs one operation
//! at a time and a borrow always sees the settled outcome of the deposit
//! before it.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::LoanPolicy;
use crate::error::{Denial, GatewayError, LoanError};
use crate::gateway::{ContractCall, SettlementGateway, TxReceipt};
use crate::models::{Amount, CollateralPosition, LoanPosition, RiskAssessment, WalletSession};
use crate::oracle::RiskOracle;

// ─── Contract ABI ─────────────────────────────────────────────────────────────

pub const DEPOSIT_FN: &str = "depositCollateral(uint256)";
pub const BORROW_FN: &str = "borrow(uint256,uint8)";
pub const COLLATERAL_QUERY: &str = "collateralOf(address)";
pub const LOAN_QUERY: &str = "loanOf(address)";

// ─── Outcomes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DepositReceipt {
    pub collateral: CollateralPosition,
    pub tx:         TxReceipt,
}

#[derive(Debug, Clone, Serialize)]
pub struct BorrowReceipt {
    pub loan:       LoanPosition,
    pub assessment: RiskAssessment,
    pub tx:         TxReceipt,
}

/// Read-only view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub wallet:         Option<String>,
    pub connected:      bool,
    pub collateralized: bool,
    pub borrowed:       bool,
    pub collateral:     Option<CollateralPosition>,
    pub loan:           Option<LoanPosition>,
}

// ─── Orchestrator ─────────────────────────────────────────────────────────────

pub struct LoanOrchestrator {
    gateway:          Arc<dyn SettlementGateway>,
    oracle:           Arc<dyn RiskOracle>,
    contract_address: String,
    policy:           LoanPolicy,

    session:    Option<WalletSession>,
    collateral: Option<CollateralPosition>,
    loan:       Option<LoanPosition>,
}

impl LoanOrchestrator {
    pub fn new(
        gateway: Arc<dyn SettlementGateway>,
        oracle: Arc<dyn RiskOracle>,
        contract_address: impl Into<String>,
        policy: LoanPolicy,
    ) -> Self {
        Self {
            gateway,
            oracle,
            contract_address: contract_address.into(),
            policy,
            session: None,
            collateral: None,
            loan: None,
        }
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    pub fn collateral(&self) -> Option<&CollateralPosition> {
        self.collateral.as_ref()
    }

    pub fn loan(&self) -> Option<&LoanPosition> {
        self.loan.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_collateralized(&self) -> bool {
        self.collateral
            .as_ref()
            .map(CollateralPosition::is_collateralized)
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            wallet:         self.session.as_ref().map(|s| s.address.clone()),
            connected:      self.is_connected(),
            collateralized: self.is_collateralized(),
            borrowed:       self.loan.is_some(),
            collateral:     self.collateral.clone(),
            loan:           self.loan.clone(),
        }
    }

    // ─── connect ──────────────────────────────────────────────────────────────

    /// Disconnected → Connected.  Already connected: returns the existing
    /// session without touching the relay or any position.
    pub async fn connect(&mut self) -> Result<WalletSession, LoanError> {
        if let Some(session) = &self.session {
            info!(wallet = %session.address, "Wallet already connected — reusing session");
            return Ok(session.clone());
        }

        let session = self.gateway.connect().await.map_err(|e| {
            warn!(error = %e, "❌ Wallet connection failed");
            match e {
                GatewayError::ConnectionFailed(msg) => LoanError::ConnectionFailed(msg),
                other => LoanError::ConnectionFailed(other.to_string()),
            }
        })?;

        info!(wallet = %session.address, session_id = %session.session_id, "🔗 Session connected");
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Drop the session and every position that belonged to it.
    pub fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            info!(wallet = %session.address, "Session disconnected");
        }
        self.collateral = None;
        self.loan = None;
    }

    // ─── depositCollateral ────────────────────────────────────────────────────

    /// `amount` is already validated by its type; the session is checked
    /// before any network call.
    pub async fn deposit_collateral(&mut self, amount: Amount) -> Result<DepositReceipt, LoanError> {
        // ── 1. Preconditions ──────────────────────────────────────────────────
        let address = self.require_session()?.address.clone();

        // ── 2. Send ───────────────────────────────────────────────────────────
        let call = ContractCall::new(
            self.contract_address.clone(),
            DEPOSIT_FN,
            vec![json!(amount.to_string())],
        );
        let tx = self.gateway.send_transaction(&call).await.map_err(|e| {
            warn!(error = %e, amount = %amount, "❌ Deposit failed");
            LoanError::from(e)
        })?;

        // ── 3. Confirm from chain ─────────────────────────────────────────────
        let confirmed = self.read_confirmed(COLLATERAL_QUERY, &address, &tx).await?;
        let position = CollateralPosition::confirmed(confirmed, self.policy.collateral_symbol.clone());

        // Local state is left as it was: the contract disagrees with the
        // acknowledgement, and `refresh` is the way to resync.
        if !position.is_collateralized() {
            warn!(tx_hash = ?tx.tx_hash, "Deposit acknowledged but contract reports no collateral");
            return Err(LoanError::GatewayRejected(
                "deposit acknowledged but contract reports no collateral".into(),
            ));
        }

        info!(
            requested = %amount,
            confirmed = %position.amount,
            currency  = %position.currency,
            "💰 Collateral confirmed"
        );
        self.collateral = Some(position.clone());

        Ok(DepositReceipt { collateral: position, tx })
    }

    // ─── borrowLoan ───────────────────────────────────────────────────────────

    pub async fn borrow_loan(&mut self, amount: Amount) -> Result<BorrowReceipt, LoanError> {
        // ── 1. Preconditions ──────────────────────────────────────────────────
        let address = self.require_session()?.address.clone();
        if !self.is_collateralized() {
            return Err(LoanError::Validation(
                "deposit collateral before borrowing".into(),
            ));
        }

        // ── 2. Fresh risk assessment for the connected wallet ─────────────────
        let assessment = self.oracle.get_risk_score(&address).await;
        let threshold = self.policy.risk_threshold;

        if !assessment.within(threshold) {
            warn!(
                wallet    = %address,
                score     = assessment.score,
                threshold,
                "⛔ Borrow denied — risk above threshold, nothing sent"
            );
            return Err(LoanError::Denied(Denial::HighRisk {
                score: assessment.score,
                threshold,
            }));
        }

        // ── 3. Send borrow(amount, score) ─────────────────────────────────────
        let call = ContractCall::new(
            self.contract_address.clone(),
            BORROW_FN,
            vec![json!(amount.to_string()), json!(assessment.score)],
        );
        let tx = self.gateway.send_transaction(&call).await.map_err(|e| {
            warn!(error = %e, amount = %amount, "❌ Borrow failed");
            match e {
                GatewayError::Rejected(msg) => LoanError::Denied(Denial::GatewayRejected(msg)),
                other => LoanError::from(other),
            }
        })?;

        // ── 4. Confirm from chain ─────────────────────────────────────────────
        let principal = self.read_confirmed(LOAN_QUERY, &address, &tx).await?;
        if principal <= BigDecimal::from(0) {
            warn!(tx_hash = ?tx.tx_hash, "Borrow acknowledged but contract reports no loan");
            return Err(LoanError::Denied(Denial::GatewayRejected(
                "borrow acknowledged but contract reports no loan".into(),
            )));
        }
        let loan = LoanPosition::confirmed(principal, self.policy.loan_symbol.clone(), assessment.score);

        info!(
            requested = %amount,
            principal = %loan.principal,
            score     = assessment.score,
            source    = ?assessment.source,
            "🏦 Loan confirmed"
        );
        self.loan = Some(loan.clone());

        Ok(BorrowReceipt { loan, assessment, tx })
    }

    // ─── refresh ──────────────────────────────────────────────────────────────

    /// Re-read both positions from the contract.
    pub async fn refresh(&mut self) -> Result<SessionSnapshot, LoanError> {
        let address = self.require_session()?.address.clone();

        let collateral = self.read(COLLATERAL_QUERY, &address).await?;
        let principal = self.read(LOAN_QUERY, &address).await?;

        let position = CollateralPosition::confirmed(collateral, self.policy.collateral_symbol.clone());
        let collateralized = position.is_collateralized();
        self.collateral = collateralized.then_some(position);

        let zero = BigDecimal::from(0);
        self.loan = match self.loan.take() {
            Some(_) if principal <= zero => None,
            Some(_) if !collateralized => {
                warn!(wallet = %address, "Contract reports a loan without collateral — dropping local loan");
                None
            }
            Some(mut loan) => {
                loan.principal = principal;
                loan.confirmed_at = chrono::Utc::now();
                Some(loan)
            }
            None => {
                if principal > zero {
                    info!(wallet = %address, principal = %principal, "Loan on chain not issued by this session — not tracked");
                }
                None
            }
        };

        Ok(self.snapshot())
    }

    // ─── Helpers ──────────────────────────────────────────────────────────────

    fn require_session(&self) -> Result<&WalletSession, LoanError> {
        self.session
            .as_ref()
            .ok_or_else(|| LoanError::Validation("wallet not connected".into()))
    }

    async fn read(&self, query: &str, address: &str) -> Result<BigDecimal, LoanError> {
        let call = ContractCall::new(self.contract_address.clone(), query, vec![json!(address)]);
        let snapshot = self.gateway.query_state(&call).await?;
        Ok(snapshot.decimal()?)
    }

    /// Read after a successful transaction.  Any failure here means the
    /// transaction went out but its effect is unknown, so it is surfaced as a
    /// network error the user can resolve with `refresh`.
    async fn read_confirmed(
        &self,
        query: &str,
        address: &str,
        tx: &TxReceipt,
    ) -> Result<BigDecimal, LoanError> {
        self.read(query, address).await.map_err(|e| {
            warn!(tx_hash = ?tx.tx_hash, error = %e, "Transaction sent but confirmation read failed");
            LoanError::Network(format!(
                "{} sent (tx {}) but could not be confirmed: {e}",
                tx.function_name,
                tx.tx_hash.as_deref().unwrap_or("unknown"),
            ))
        })
    }
}
