use std::sync::atomic::{AtomicU64, Ordering};

use crate::blockchain::{BlockScanner, RpcClient, TransactionFilter};
use crate::config::AppConfig;
use crate::error::Result;
use crate::logging::{LogContext, MetricsLogger};
use crate::models::{SubscriptionRegistry, Transaction};

/// Number of recent blocks searched by [`EthereumParser::get_transactions`]
pub const DEFAULT_WINDOW_SIZE: u64 = 5;

/// Entry point used by the HTTP and CLI front ends.
///
/// One instance may be shared across tasks. Each query issues its own RPC
/// calls; only the subscription set is shared mutable state.
pub struct EthereumParser {
    scanner: BlockScanner,
    subscriptions: SubscriptionRegistry,
    last_observed_block: AtomicU64,
    window_size: u64,
}

impl EthereumParser {
    pub fn new(rpc_client: RpcClient) -> Self {
        Self::with_window_size(rpc_client, DEFAULT_WINDOW_SIZE)
    }

    pub fn with_window_size(rpc_client: RpcClient, window_size: u64) -> Self {
        Self {
            scanner: BlockScanner::new(rpc_client),
            subscriptions: SubscriptionRegistry::new(),
            last_observed_block: AtomicU64::new(0),
            window_size,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let rpc_client = RpcClient::from_config(&config.rpc)?;
        Ok(Self::with_window_size(rpc_client, config.scan.window_size))
    }

    pub fn endpoint(&self) -> &str {
        self.scanner.rpc_client().endpoint()
    }

    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Latest block height. Failures are logged and returned, never mapped to 0.
    pub async fn get_current_block(&self) -> Result<u64> {
        let height = self.scanner.current_block_height().await?;
        self.last_observed_block.store(height, Ordering::Relaxed);
        Ok(height)
    }

    /// Height seen by the last successful [`get_current_block`](Self::get_current_block), 0 before any.
    pub fn last_observed_block(&self) -> u64 {
        self.last_observed_block.load(Ordering::Relaxed)
    }

    /// Subscribe `address`; `true` if it was not subscribed before.
    pub fn subscribe(&self, address: &str) -> bool {
        let newly_subscribed = self.subscriptions.subscribe(address);
        MetricsLogger::log_subscription(address, newly_subscribed);
        newly_subscribed
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    /// Transactions from or to `address` in the most recent blocks, newest block first.
    ///
    /// Fails only when the current height cannot be determined. Blocks that
    /// fail inside the window are skipped, so the result may be partial.
    pub async fn get_transactions(&self, address: &str) -> Result<Vec<Transaction>> {
        let height = self.get_current_block().await?;
        let blocks = self.scanner.scan_recent_blocks(height, self.window_size).await;
        let transactions = TransactionFilter::new(address).filter_blocks(&blocks);

        LogContext::new("parser", "get_transactions")
            .with_address(address)
            .with_block_number(height)
            .with_metadata("blocks_scanned", serde_json::json!(blocks.len()))
            .with_metadata("transaction_count", serde_json::json!(transactions.len()))
            .info(&format!("Found {} transactions for {}", transactions.len(), address));

        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_parser() -> EthereumParser {
        EthereumParser::new(RpcClient::with_timeout("http://127.0.0.1:9", 1).unwrap())
    }

    #[test]
    fn test_new_parser() {
        let parser = offline_parser();
        assert_eq!(parser.window_size(), DEFAULT_WINDOW_SIZE);
        assert_eq!(parser.endpoint(), "http://127.0.0.1:9");
        assert_eq!(parser.last_observed_block(), 0);
        assert!(parser.subscriptions().is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.rpc.endpoint = "http://localhost:8545".to_string();
        config.scan.window_size = 3;

        let parser = EthereumParser::from_config(&config).unwrap();
        assert_eq!(parser.endpoint(), "http://localhost:8545");
        assert_eq!(parser.window_size(), 3);
    }

    #[test]
    fn test_subscribe() {
        let parser = offline_parser();
        assert!(parser.subscribe("0x123"));
        assert!(!parser.subscribe("0x123"));
        assert!(parser.subscriptions().is_subscribed("0x123"));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_an_error_not_zero() {
        let parser = offline_parser();
        assert!(parser.get_current_block().await.is_err());
        assert!(parser.get_transactions("0x123").await.is_err());
        assert_eq!(parser.last_observed_block(), 0);
    }
}
