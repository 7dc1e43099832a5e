use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::blockchain::hex::{hex_to_int, int_to_hex};
use crate::config::RpcConfig;
use crate::error::{DecodeError, ParserError, Result, TransportError};
use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};

/// The id is constant; responses are not correlated with requests.
const REQUEST_ID: u64 = 1;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Vec<Value>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Block as returned by `eth_getBlockByNumber` with full transaction objects
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub number: String,
    pub timestamp: String,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

/// Transaction object embedded in a block, fields kept as sent by the node
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTransaction {
    pub from: String,
    /// Absent or null for contract creation
    #[serde(default)]
    pub to: Option<String>,
    pub value: String,
    pub gas: String,
    #[serde(rename = "gasPrice")]
    pub gas_price: String,
    pub hash: String,
    pub nonce: String,
}

#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> std::result::Result<Self, TransportError> {
        Self::with_timeout(endpoint, RpcConfig::default().timeout_seconds)
    }

    pub fn from_config(config: &RpcConfig) -> std::result::Result<Self, TransportError> {
        Self::with_timeout(config.endpoint.clone(), config.timeout_seconds)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout_seconds: u64) -> std::result::Result<Self, TransportError> {
        let endpoint = endpoint.into();
        LogContext::new("rpc_client", "initialization")
            .with_metadata("endpoint", serde_json::json!(endpoint))
            .with_metadata("timeout_seconds", serde_json::json!(timeout_seconds))
            .info("Initializing RPC client");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout_seconds,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one JSON-RPC request and return the unparsed response body.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> std::result::Result<Vec<u8>, TransportError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: REQUEST_ID,
        };

        LogContext::new("rpc_client", "call")
            .with_metadata("method", serde_json::json!(method))
            .trace(&format!("Sending RPC request: {}", method));

        // .json() sets content-type: application/json
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(body.to_vec())
    }

    /// Call `method` and decode the `result` member of the response envelope.
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let monitor = PerformanceMonitor::new(&format!("rpc_{}", method));

        let result = match self.call(method, params).await {
            Ok(body) => decode_response(method, &body),
            Err(e) => Err(ParserError::from(e)),
        };

        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_rpc_call(method, duration, result.is_ok());

        result
    }

    /// `eth_blockNumber`, decoded
    pub async fn get_block_number(&self) -> Result<u64> {
        let hex_string: String = self.request("eth_blockNumber", vec![]).await?;
        Ok(hex_to_int(&hex_string)?)
    }

    /// `eth_getBlockByNumber(height, true)`: full transaction objects, not hashes
    pub async fn get_block_by_number(&self, block_number: u64) -> Result<Block> {
        let params = vec![Value::String(int_to_hex(block_number)), Value::Bool(true)];

        let block: Option<Block> = self.request("eth_getBlockByNumber", params).await?;
        block.ok_or_else(|| DecodeError::BlockNotFound { block_number }.into())
    }

    fn classify(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else if error.is_connect() {
            TransportError::Connection(error.to_string())
        } else {
            TransportError::Http(error)
        }
    }
}

fn decode_response<T: DeserializeOwned>(method: &str, body: &[u8]) -> Result<T> {
    let mut envelope: Value = serde_json::from_slice(body).map_err(DecodeError::from)?;
    if !envelope.is_object() {
        return Err(DecodeError::InvalidResponse(format!("{} response is not a JSON object", method)).into());
    }

    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        let error: JsonRpcError = serde_json::from_value(error.clone()).map_err(DecodeError::from)?;
        return Err(DecodeError::Rpc {
            code: error.code,
            message: error.message,
        }
        .into());
    }

    // A missing `result` member is a malformed envelope; an explicit null is
    // left to T (eth_getBlockByNumber answers null for unknown blocks).
    let result = envelope
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| DecodeError::MissingResult {
            method: method.to_string(),
        })?;

    Ok(serde_json::from_value(result).map_err(DecodeError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rpc_client_creation() {
        let client = RpcClient::with_timeout("http://localhost:8545", 5).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8545");
        assert_eq!(client.timeout_seconds, 5);
    }

    #[test]
    fn test_json_rpc_request_serialization() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_getBlockByNumber",
            params: vec![json!("0x4b7"), json!(true)],
            id: REQUEST_ID,
        };

        let serialized = serde_json::to_string(&request).unwrap();
        let expected = r#"{"jsonrpc":"2.0","method":"eth_getBlockByNumber","params":["0x4b7",true],"id":1}"#;
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_decode_response_success() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":"0x4b7"}"#;
        let result: String = decode_response("eth_blockNumber", body).unwrap();
        assert_eq!(result, "0x4b7");
    }

    #[test]
    fn test_decode_response_rpc_error() {
        let body = br#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":1}"#;
        let result: Result<String> = decode_response("eth_foo", body);
        match result {
            Err(ParserError::Decode(DecodeError::Rpc { code, message })) => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected RPC error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_response_missing_result() {
        let body = br#"{"jsonrpc":"2.0","id":1}"#;
        let result: Result<String> = decode_response("eth_blockNumber", body);
        assert!(matches!(
            result,
            Err(ParserError::Decode(DecodeError::MissingResult { ref method })) if method == "eth_blockNumber"
        ));
    }

    #[test]
    fn test_decode_response_wrong_type() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":1207}"#;
        let result: Result<String> = decode_response("eth_blockNumber", body);
        assert!(matches!(result, Err(ParserError::Decode(DecodeError::Json(_)))));

        let result: Result<String> = decode_response("eth_blockNumber", b"<html>bad gateway</html>");
        assert!(matches!(result, Err(ParserError::Decode(DecodeError::Json(_)))));

        let result: Result<String> = decode_response("eth_blockNumber", b"[1, 2]");
        assert!(matches!(result, Err(ParserError::Decode(DecodeError::InvalidResponse(_)))));
    }

    #[test]
    fn test_decode_null_block() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let block: Option<Block> = decode_response("eth_getBlockByNumber", body).unwrap();
        assert!(block.is_none());
    }

    #[test]
    fn test_block_deserialization_tolerates_contract_creation() {
        let block: Block = serde_json::from_value(json!({
            "number": "0x4b7",
            "hash": "0xblock",
            "timestamp": "0x5c0",
            "transactions": [
                {
                    "from": "0x123", "to": null, "value": "0x0", "gas": "0x5208",
                    "gasPrice": "0x1", "hash": "0xa", "nonce": "0x1", "input": "0x6080"
                },
                {
                    "from": "0x123", "value": "0x0", "gas": "0x5208",
                    "gasPrice": "0x1", "hash": "0xb", "nonce": "0x2"
                }
            ]
        }))
        .unwrap();

        assert_eq!(block.transactions.len(), 2);
        assert!(block.transactions[0].to.is_none());
        assert!(block.transactions[1].to.is_none());
        assert_eq!(block.transactions[0].gas_price, "0x1");
    }

    #[test]
    fn test_block_deserialization_requires_transaction_fields() {
        let result = serde_json::from_value::<Block>(json!({
            "number": "0x4b7",
            "timestamp": "0x5c0",
            "transactions": [{ "from": "0x123", "to": "0x456" }]
        }));
        assert!(result.is_err());
    }
}
