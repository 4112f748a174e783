//! HTTP clients against local stub relay / oracle servers.

use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use bigdecimal::BigDecimal;
use serde_json::{json, Value};

use lendr::{
    models::{Amount, RiskSource},
    orchestrator::{COLLATERAL_QUERY, DEPOSIT_FN},
    ContractCall, Denial, GatewayConfig, GatewayError, HttpRiskOracle, LoanError, LoanOrchestrator,
    LoanPolicy, OracleConfig, RelayGateway, RiskOracle, SettlementGateway,
};

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A port nothing listens on.
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn gateway(base_url: String, timeout: Duration) -> RelayGateway {
    RelayGateway::new(
        reqwest::Client::new(),
        GatewayConfig {
            base_url,
            api_key: "relay-secret".into(),
            contract_address: "0xLEND".into(),
            timeout,
        },
    )
}

fn oracle(base_url: String, timeout: Duration) -> HttpRiskOracle {
    HttpRiskOracle::new(
        reqwest::Client::new(),
        OracleConfig {
            base_url,
            timeout,
            fallback_score: 3,
        },
    )
}

fn deposit_call(amount: &str) -> ContractCall {
    ContractCall::new("0xLEND", DEPOSIT_FN, vec![json!(amount)])
}

type Log = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Relay that answers every send with `reply` and records auth + body.
fn recording_relay(log: Log, reply: Value) -> Router {
    Router::new().route(
        "/transaction/send",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let log = log.clone();
            let reply = reply.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                log.lock().unwrap().push((auth, body));
                Json(reply)
            }
        }),
    )
}

// ─── Settlement Gateway ───────────────────────────────────────────────────────

#[tokio::test]
async fn connect_returns_the_provider_wallet() {
    let app = Router::new().route(
        "/wallet/connect",
        post(|| async { Json(json!({ "success": true, "walletAddress": "0xABCD" })) }),
    );
    let gw = gateway(spawn(app).await, Duration::from_secs(2));

    let session = gw.connect().await.unwrap();

    assert_eq!(session.address, "0xABCD");
}

#[tokio::test]
async fn connect_failure_is_reported_verbatim() {
    let app = Router::new().route(
        "/wallet/connect",
        post(|| async { Json(json!({ "success": false, "error": "user rejected the request" })) }),
    );
    let gw = gateway(spawn(app).await, Duration::from_secs(2));

    let err = gw.connect().await.unwrap_err();

    assert_eq!(err, GatewayError::ConnectionFailed("user rejected the request".into()));
}

#[tokio::test]
async fn connect_to_unreachable_provider_is_a_connection_failure() {
    let gw = gateway(dead_url().await, Duration::from_secs(2));

    assert!(matches!(gw.connect().await, Err(GatewayError::ConnectionFailed(_))));
}

#[tokio::test]
async fn send_carries_bearer_token_and_exact_amount() {
    let log: Log = Arc::default();
    let app = recording_relay(log.clone(), json!({ "success": true, "txHash": "0xabc" }));
    let gw = gateway(spawn(app).await, Duration::from_secs(2));

    let receipt = gw
        .send_transaction(&deposit_call("100.000000000000000001"))
        .await
        .unwrap();

    assert_eq!(receipt.tx_hash.as_deref(), Some("0xabc"));
    assert_eq!(receipt.function_name, DEPOSIT_FN);

    let log = log.lock().unwrap();
    let (auth, body) = &log[0];
    assert_eq!(auth.as_deref(), Some("Bearer relay-secret"));
    assert_eq!(body["contractAddress"], "0xLEND");
    assert_eq!(body["functionName"], DEPOSIT_FN);
    assert_eq!(body["functionArgs"], json!(["100.000000000000000001"]));
}

#[tokio::test]
async fn business_rejection_is_terminal() {
    let log: Log = Arc::default();
    let app = recording_relay(log, json!({ "success": false, "message": "execution reverted" }));
    let gw = gateway(spawn(app).await, Duration::from_secs(2));

    let err = gw.send_transaction(&deposit_call("10")).await.unwrap_err();

    assert_eq!(err, GatewayError::Rejected("execution reverted".into()));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unreachable_relay_is_a_retryable_network_error() {
    let gw = gateway(dead_url().await, Duration::from_secs(2));

    let err = gw.send_transaction(&deposit_call("10")).await.unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_relay_times_out_as_network_error() {
    let app = Router::new().route(
        "/transaction/send",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "success": true }))
        }),
    );
    let gw = gateway(spawn(app).await, Duration::from_millis(150));

    let err = gw.send_transaction(&deposit_call("10")).await.unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn http_errors_split_into_unavailable_and_rejected() {
    let app = Router::new()
        .route("/transaction/send", post(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/contract/read",
            post(|| async { (StatusCode::BAD_REQUEST, "bad function signature") }),
        );
    let gw = gateway(spawn(app).await, Duration::from_secs(2));

    let send = gw.send_transaction(&deposit_call("10")).await.unwrap_err();
    assert!(matches!(send, GatewayError::Network(_)));

    let read = gw
        .query_state(&ContractCall::new("0xLEND", COLLATERAL_QUERY, vec![json!("0xABCD")]))
        .await
        .unwrap_err();
    match read {
        GatewayError::Rejected(msg) => assert!(msg.contains("bad function signature")),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn query_state_reads_the_contract_result() {
    let app = Router::new().route(
        "/contract/read",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["functionName"], COLLATERAL_QUERY);
            assert_eq!(body["functionArgs"], json!(["0xABCD"]));
            Json(json!({ "success": true, "result": "250.75" }))
        }),
    );
    let gw = gateway(spawn(app).await, Duration::from_secs(2));

    let snapshot = gw
        .query_state(&ContractCall::new("0xLEND", COLLATERAL_QUERY, vec![json!("0xABCD")]))
        .await
        .unwrap();

    assert_eq!(snapshot.decimal().unwrap(), BigDecimal::from_str("250.75").unwrap());
}

// ─── Risk Oracle ──────────────────────────────────────────────────────────────

fn scoring_oracle(reply: Value) -> Router {
    Router::new().route(
        "/get-risk-score",
        get(move |Query(params): Query<std::collections::HashMap<String, String>>| {
            let mut reply = reply.clone();
            async move {
                reply["wallet"] = json!(params.get("wallet").cloned().unwrap_or_default());
                Json(reply)
            }
        }),
    )
}

#[tokio::test]
async fn live_score_is_used_when_valid() {
    let url = spawn(scoring_oracle(json!({ "score": 4, "explanation": "Risk score: 4/10 (Medium)" }))).await;

    let assessment = oracle(url, Duration::from_secs(2)).get_risk_score("0xABCD").await;

    assert_eq!(assessment.score, 4);
    assert_eq!(assessment.source, RiskSource::Live);
    assert_eq!(assessment.explanation.as_deref(), Some("Risk score: 4/10 (Medium)"));
}

#[tokio::test]
async fn zero_is_a_real_score_not_a_missing_one() {
    let url = spawn(scoring_oracle(json!({ "score": 0 }))).await;

    let assessment = oracle(url, Duration::from_secs(2)).get_risk_score("0xABCD").await;

    assert_eq!((assessment.score, assessment.source), (0, RiskSource::Live));
}

#[tokio::test]
async fn bad_oracle_answers_fall_back() {
    for reply in [json!({ "score": 42 }), json!({ "score": -1 }), json!({ "category": "Low" }), json!({ "score": "low" })] {
        let url = spawn(scoring_oracle(reply.clone())).await;

        let assessment = oracle(url, Duration::from_secs(2)).get_risk_score("0xABCD").await;

        assert_eq!(assessment.source, RiskSource::Fallback, "reply {reply}");
        assert_eq!(assessment.score, 3);
    }
}

#[tokio::test]
async fn oracle_http_error_timeout_and_outage_fall_back() {
    let failing = Router::new()
        .route("/get-risk-score", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
    let slow = Router::new().route(
        "/get-risk-score",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "score": 1 }))
        }),
    );

    for url in [spawn(failing).await, spawn(slow).await, dead_url().await] {
        let assessment = oracle(url, Duration::from_millis(150)).get_risk_score("0xABCD").await;
        assert_eq!(assessment.source, RiskSource::Fallback);
        assert_eq!(assessment.score, 3);
    }
}

// ─── End to end ───────────────────────────────────────────────────────────────

/// Relay stub that behaves like the lending contract.
#[derive(Default)]
struct Ledger {
    collateral: Mutex<BigDecimal>,
    loans:      Mutex<BigDecimal>,
    borrows:    Mutex<Vec<Value>>,
}

fn contract_relay(ledger: Arc<Ledger>) -> Router {
    let send_ledger = ledger.clone();
    Router::new()
        .route(
            "/wallet/connect",
            post(|| async { Json(json!({ "success": true, "walletAddress": "0xABCD" })) }),
        )
        .route(
            "/transaction/send",
            post(move |Json(body): Json<Value>| {
                let ledger = send_ledger.clone();
                async move {
                    let amount =
                        BigDecimal::from_str(body["functionArgs"][0].as_str().unwrap()).unwrap();
                    if body["functionName"] == DEPOSIT_FN {
                        let mut c = ledger.collateral.lock().unwrap();
                        *c = c.clone() + amount;
                    } else {
                        ledger.borrows.lock().unwrap().push(body["functionArgs"].clone());
                        let mut l = ledger.loans.lock().unwrap();
                        *l = l.clone() + amount;
                    }
                    Json(json!({ "success": true, "txHash": "0x1" }))
                }
            }),
        )
        .route(
            "/contract/read",
            post(move |Json(body): Json<Value>| {
                let ledger = ledger.clone();
                async move {
                    let value = if body["functionName"] == COLLATERAL_QUERY {
                        ledger.collateral.lock().unwrap().to_string()
                    } else {
                        ledger.loans.lock().unwrap().to_string()
                    };
                    Json(json!({ "success": true, "result": value }))
                }
            }),
        )
}

fn amount(raw: &str) -> Amount {
    raw.parse().unwrap()
}

async fn live_orchestrator(ledger: Arc<Ledger>, oracle_url: String) -> LoanOrchestrator {
    let relay_url = spawn(contract_relay(ledger)).await;
    LoanOrchestrator::new(
        Arc::new(gateway(relay_url, Duration::from_secs(2))),
        Arc::new(oracle(oracle_url, Duration::from_millis(300))),
        "0xLEND",
        LoanPolicy::default(),
    )
}

#[tokio::test]
async fn connect_deposit_borrow_over_http() {
    let ledger = Arc::new(Ledger::default());
    let oracle_url = spawn(scoring_oracle(json!({ "score": 5 }))).await;
    let mut orch = live_orchestrator(ledger.clone(), oracle_url).await;

    orch.connect().await.unwrap();
    let deposit = orch.deposit_collateral(amount("100")).await.unwrap();
    assert_eq!(deposit.collateral.amount, BigDecimal::from(100));

    let borrow = orch.borrow_loan(amount("50")).await.unwrap();
    assert_eq!(borrow.loan.principal, BigDecimal::from(50));
    assert_eq!(*ledger.borrows.lock().unwrap(), vec![json!(["50", 5])]);
}

#[tokio::test]
async fn high_risk_borrow_never_hits_the_relay() {
    let ledger = Arc::new(Ledger::default());
    let oracle_url = spawn(scoring_oracle(json!({ "score": 7 }))).await;
    let mut orch = live_orchestrator(ledger.clone(), oracle_url).await;
    orch.connect().await.unwrap();
    orch.deposit_collateral(amount("100")).await.unwrap();

    let err = orch.borrow_loan(amount("50")).await.unwrap_err();

    assert_eq!(err, LoanError::Denied(Denial::HighRisk { score: 7, threshold: 5 }));
    assert!(ledger.borrows.lock().unwrap().is_empty());
    assert!(orch.loan().is_none());
}

#[tokio::test]
async fn oracle_outage_borrows_with_fallback_score() {
    let ledger = Arc::new(Ledger::default());
    let mut orch = live_orchestrator(ledger.clone(), dead_url().await).await;
    orch.connect().await.unwrap();
    orch.deposit_collateral(amount("100")).await.unwrap();

    let borrow = orch.borrow_loan(amount("50")).await.unwrap();

    assert_eq!(borrow.assessment.source, RiskSource::Fallback);
    assert_eq!(borrow.loan.risk_score_at_issuance, 3);
    assert_eq!(*ledger.borrows.lock().unwrap(), vec![json!(["50", 3])]);
}
