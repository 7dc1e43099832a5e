use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::error::ParserError;
use crate::models::Transaction;
use crate::parser::EthereumParser;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server error: {0}")]
    Server(String),
}

/// Response structure for the current-block endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBlockResponse {
    pub current_block: u64,
}

/// Response structure for the subscribe endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub subscribed: bool,
}

/// Query parameters shared by the address endpoints
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    pub address: String,
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<EthereumParser>,
}

/// HTTP API server
pub struct ApiServer {
    parser: Arc<EthereumParser>,
    pub host: String,
    pub port: u16,
}

impl ApiServer {
    pub fn new(parser: Arc<EthereumParser>, host: impl Into<String>, port: u16) -> Self {
        Self {
            parser,
            host: host.into(),
            port,
        }
    }

    pub fn router(&self) -> Router {
        router(AppState {
            parser: self.parser.clone(),
        })
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), ApiError> {
        let app = self.router();

        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApiError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        log::info!("HTTP API server starting on {}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| ApiError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// Routes for the three parser operations
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/currentBlock", get(get_current_block))
        .route("/subscribe", get(subscribe))
        .route("/transactions", get(get_transactions))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

fn require_address(query: &AddressQuery) -> Result<&str, (StatusCode, Json<ErrorResponse>)> {
    let address = query.address.as_str();
    if address.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid_parameter".to_string(),
                message: "Address is required".to_string(),
            }),
        ));
    }
    Ok(address)
}

fn upstream_failure(context: &str, error: ParserError) -> (StatusCode, Json<ErrorResponse>) {
    log::error!("{}: {}", context, error);
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: error.code().to_string(),
            message: format!("{}: {}", context, error),
        }),
    )
}

/// GET /currentBlock
pub async fn get_current_block(State(state): State<AppState>) -> ApiResult<CurrentBlockResponse> {
    match state.parser.get_current_block().await {
        Ok(current_block) => Ok(Json(CurrentBlockResponse { current_block })),
        Err(e) => Err(upstream_failure("Failed to get current block", e)),
    }
}

/// GET /subscribe?address=...
pub async fn subscribe(Query(query): Query<AddressQuery>, State(state): State<AppState>) -> ApiResult<SubscribeResponse> {
    let address = require_address(&query)?;
    let subscribed = state.parser.subscribe(address);
    Ok(Json(SubscribeResponse { subscribed }))
}

/// GET /transactions?address=...
pub async fn get_transactions(
    Query(query): Query<AddressQuery>,
    State(state): State<AppState>,
) -> ApiResult<Vec<Transaction>> {
    let address = require_address(&query)?;
    match state.parser.get_transactions(address).await {
        Ok(transactions) => Ok(Json(transactions)),
        Err(e) => Err(upstream_failure("Failed to get transactions", e)),
    }
}
