use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use eth_tx_parser::api::{router, AppState};
use eth_tx_parser::blockchain::RpcClient;
use eth_tx_parser::parser::EthereumParser;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock node at height 1207 whose newest block holds one transaction from 0x123 to 0x456
async fn setup_mock_node() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_blockNumber" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1, "result": "0x4b7"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getBlockByNumber", "params": ["0x4b7", true] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "number": "0x4b7",
                "timestamp": "0x5c0",
                "transactions": [{
                    "from": "0x123",
                    "to": "0x456",
                    "value": "0x1",
                    "gas": "0x5208",
                    "gasPrice": "0x3b9aca00",
                    "hash": "0x789",
                    "nonce": "0x0"
                }]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getBlockByNumber" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1, "result": null
        })))
        .mount(&server)
        .await;

    server
}

fn create_test_router(endpoint: String) -> Router {
    let rpc_client = RpcClient::with_timeout(endpoint, 5).expect("Failed to build RPC client");
    router(AppState {
        parser: Arc::new(EthereumParser::new(rpc_client)),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_current_block_endpoint() {
    let server = setup_mock_node().await;
    let app = create_test_router(server.uri());

    let (status, json) = get(app, "/currentBlock").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "currentBlock": 1207 }));
}

#[tokio::test]
async fn test_subscribe_endpoint() {
    let server = setup_mock_node().await;
    let app = create_test_router(server.uri());

    let (status, json) = get(app.clone(), "/subscribe?address=0x123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "subscribed": true }));

    // Router clones share the parser, and with it the subscription set
    let (status, json) = get(app, "/subscribe?address=0x123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "subscribed": false }));
}

#[tokio::test]
async fn test_transactions_endpoint() {
    let server = setup_mock_node().await;
    let app = create_test_router(server.uri());

    let (status, json) = get(app, "/transactions?address=0x123").await;

    assert_eq!(status, StatusCode::OK);
    let transactions = json.as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(
        transactions[0],
        json!({
            "from": "0x123",
            "to": "0x456",
            "value": "0x1",
            "blockNumber": 1207,
            "gas": 21000,
            "gasPrice": "0x3b9aca00",
            "hash": "0x789",
            "nonce": 0,
            "timestamp": 1472
        })
    );
}

#[tokio::test]
async fn test_transactions_endpoint_no_match() {
    let server = setup_mock_node().await;
    let app = create_test_router(server.uri());

    let (status, json) = get(app, "/transactions?address=0xnobody").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_missing_address_is_bad_request() {
    let server = setup_mock_node().await;

    for uri in ["/subscribe", "/subscribe?address=", "/transactions", "/transactions?address="] {
        let app = create_test_router(server.uri());
        let (status, json) = get(app, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(json["error"], "invalid_parameter");
        assert_eq!(json["message"], "Address is required");
    }
}

#[tokio::test]
async fn test_unreachable_node_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let app = create_test_router(server.uri());
    let (status, json) = get(app.clone(), "/currentBlock").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "transport_error");

    let (status, json) = get(app, "/transactions?address=0x123").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "transport_error");
}
