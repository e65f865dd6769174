//! REST API server for tallychain
//!
//! Exposes the ledger over HTTP: transfer submission, mining, and chain
//! reads. The ledger lives behind a single `RwLock`; every check-then-mutate
//! sequence (notably proof validation followed by sealing) runs under one
//! write guard so concurrent requests can neither lose nor duplicate pending
//! transfers.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::block::{Amount, Block, PreviousHash, Transfer};
use crate::error::LedgerError;
use crate::hashing::{block_hash, canonical_serialize};
use crate::ledger::Ledger;
use crate::proof::valid_proof;

/// Sender recorded on mining reward transfers.
const REWARD_SENDER: &str = "0";
/// Units awarded for forging a block.
const MINING_REWARD: u64 = 1;

/// Shared node state handed to every route.
#[derive(Clone)]
pub struct Node {
    pub ledger: Arc<RwLock<Ledger>>,
    pub node_id: String,
    api_stats: Arc<RwLock<ApiStats>>,
}

impl Node {
    pub fn new(ledger: Ledger, node_id: String) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            node_id,
            api_stats: Arc::new(RwLock::new(ApiStats::new())),
        }
    }

    pub async fn get_stats(&self) -> ApiStatsResponse {
        let stats = self.api_stats.read().await;
        let uptime = stats.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);

        ApiStatsResponse {
            total_requests: stats.total_requests,
            successful_requests: stats.successful_requests,
            failed_requests: stats.failed_requests,
            transfers_submitted: stats.transfers_submitted,
            blocks_forged: stats.blocks_forged,
            uptime_seconds: uptime,
        }
    }
}

/// API statistics and monitoring
#[derive(Debug, Default)]
struct ApiStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    transfers_submitted: u64,
    blocks_forged: u64,
    start_time: Option<Instant>,
}

impl ApiStats {
    fn new() -> Self {
        ApiStats {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    fn record_request(&mut self, success: bool) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Ledger(LedgerError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Ledger(e) => e.to_string(),
            ApiError::InternalError(msg) => msg,
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: message }),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct MineRequest {
    #[serde(default)]
    pub proof: Option<u64>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transfer>,
    pub proof: u64,
    pub previous_hash: PreviousHash,
}

#[derive(Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: u64,
    pub chain: Vec<Block>,
}

#[derive(Serialize, Deserialize)]
pub struct LastBlockResponse {
    pub last_block: Block,
}

#[derive(Serialize)]
pub struct ApiStatsResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub transfers_submitted: u64,
    pub blocks_forged: u64,
    pub uptime_seconds: u64,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request counting middleware
async fn stats_middleware(State(node): State<Arc<Node>>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let success = response.status().is_success();
    let mut stats = node.api_stats.write().await;
    stats.record_request(success);

    response
}

/// Request logging middleware: method, path, status, duration.
async fn logging_middleware(State(node): State<Arc<Node>>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        node_id = %node.node_id,
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints (also used by tests)
pub fn build_router(node: Arc<Node>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/transactions/new", post(receive_transfer))
        .route("/mine", post(mine))
        .route("/chain", get(full_chain))
        .route("/last_block", get(get_last_block))
        .route("/health", get(health_check))
        .route("/stats", get(get_api_stats))
        // logging before stats so timing covers the full request
        .layer(middleware::from_fn_with_state(
            node.clone(),
            logging_middleware,
        ))
        .layer(middleware::from_fn_with_state(node.clone(), stats_middleware))
        .with_state(node)
        .layer(cors)
}

/// Run the API server until the process is stopped.
pub async fn run_api_server(
    node: Arc<Node>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(node);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "api.listening");
    println!("🚀 Ledger node listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// A zero amount counts as missing, the same way a proof of 0 does in
/// [`mine`]: the wire contract rejects both with a 400.
fn amount_is_zero(amount: &Amount) -> bool {
    amount.as_f64().unwrap_or(0.0) == 0.0
}

async fn receive_transfer(
    State(node): State<Arc<Node>>,
    Json(req): Json<TransferRequest>,
) -> impl IntoResponse {
    let (sender, recipient, amount) = match (req.sender, req.recipient, req.amount) {
        (Some(s), Some(r), Some(a)) if !s.is_empty() && !r.is_empty() && !amount_is_zero(&a) => {
            (s, r, a)
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse {
                    message: "missing values".to_string(),
                }),
            )
        }
    };

    let index = {
        let mut ledger = node.ledger.write().await;
        ledger.submit_transfer(&sender, &recipient, amount)
    };

    {
        let mut stats = node.api_stats.write().await;
        stats.transfers_submitted += 1;
    }

    (
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Transaction will be added to block {}", index),
        }),
    )
}

async fn mine(
    State(node): State<Arc<Node>>,
    Json(req): Json<MineRequest>,
) -> Result<Response, ApiError> {
    // Falsy-field gate: a proof of 0 is indistinguishable from an absent one
    // here and gets the 400, even though the checker itself accepts 0.
    let proof = req.proof.filter(|p| *p != 0);
    let (proof, id) = match (proof, req.id) {
        (Some(p), Some(id)) if !id.is_empty() => (p, id),
        _ => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(MessageResponse {
                    message: "bad request".to_string(),
                }),
            )
                .into_response())
        }
    };

    // One write guard across validate-award-seal: no transfer submitted in
    // between can be dropped, and no two seals can claim the same buffer.
    let mut ledger = node.ledger.write().await;

    let last_block = ledger.last_block()?.clone();
    let last_block_string = canonical_serialize(&last_block)?;

    if !valid_proof(&last_block_string, proof) {
        return Ok((
            StatusCode::OK,
            Json(MessageResponse {
                message: "Invalid proof".to_string(),
            }),
        )
            .into_response());
    }

    ledger.submit_transfer(REWARD_SENDER, &id, Amount::from(MINING_REWARD));

    let previous_hash = PreviousHash::Digest(block_hash(&last_block)?);
    let block = ledger.seal_block(proof, Some(previous_hash))?;
    drop(ledger);

    {
        let mut stats = node.api_stats.write().await;
        stats.blocks_forged += 1;
    }

    Ok((
        StatusCode::OK,
        Json(MineResponse {
            message: "New Block Forged".to_string(),
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }),
    )
        .into_response())
}

async fn full_chain(State(node): State<Arc<Node>>) -> Json<ChainResponse> {
    let ledger = node.ledger.read().await;
    Json(ChainResponse {
        length: ledger.len() as u64,
        chain: ledger.chain().to_vec(),
    })
}

async fn get_last_block(
    State(node): State<Arc<Node>>,
) -> Result<Json<LastBlockResponse>, ApiError> {
    let ledger = node.ledger.read().await;
    let last_block = ledger.last_block()?.clone();
    Ok(Json(LastBlockResponse { last_block }))
}

async fn health_check(State(node): State<Arc<Node>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "node_id": node.node_id,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_api_stats(State(node): State<Arc<Node>>) -> impl IntoResponse {
    Json(node.get_stats().await)
}
