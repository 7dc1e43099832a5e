use serde_json::json;

use crate::blockchain::hex::hex_to_int;
use crate::blockchain::rpc_client::{Block, RawTransaction, RpcClient};
use crate::error::{ErrorSeverity, Result};
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};

/// A fetched block with its header quantities decoded
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedBlock {
    pub number: u64,
    pub timestamp: u64,
    pub transactions: Vec<RawTransaction>,
}

impl ScannedBlock {
    pub fn from_block(block: Block) -> Result<Self> {
        Ok(Self {
            number: hex_to_int(&block.number)?,
            timestamp: hex_to_int(&block.timestamp)?,
            transactions: block.transactions,
        })
    }
}

/// Heights `from_height` down to `from_height - window_size + 1`, stopping at genesis.
pub fn window_heights(from_height: u64, window_size: u64) -> impl Iterator<Item = u64> {
    let count = window_size.min(from_height.saturating_add(1));
    (0..count).map(move |offset| from_height - offset)
}

pub struct BlockScanner {
    rpc_client: RpcClient,
}

impl BlockScanner {
    pub fn new(rpc_client: RpcClient) -> Self {
        Self { rpc_client }
    }

    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }

    /// Latest block height reported by the node.
    pub async fn current_block_height(&self) -> Result<u64> {
        let result = self.rpc_client.get_block_number().await;

        match &result {
            Ok(height) => {
                LogContext::new("block_scanner", "current_block_height")
                    .with_block_number(*height)
                    .debug(&format!("Current block height is {}", height));
            }
            Err(e) => {
                ErrorLogger::log_error(e, Some(LogContext::new("block_scanner", "current_block_height")));
            }
        }

        result
    }

    /// Fetch and decode one block.
    pub async fn fetch_block(&self, height: u64) -> Result<ScannedBlock> {
        let block = self.rpc_client.get_block_by_number(height).await?;
        let scanned = ScannedBlock::from_block(block)?;

        if scanned.number != height {
            LogContext::new("block_scanner", "fetch_block")
                .with_block_number(height)
                .with_metadata("reported_number", json!(scanned.number))
                .warn("Node returned a block with a different number than requested");
        }

        MetricsLogger::log_block_scanned(scanned.number, scanned.transactions.len());
        Ok(scanned)
    }

    /// Fetch the `window_size` blocks ending at `from_height`, newest first.
    ///
    /// A block that cannot be fetched or decoded is logged and left out; the
    /// rest of the window is still returned.
    pub async fn scan_recent_blocks(&self, from_height: u64, window_size: u64) -> Vec<ScannedBlock> {
        let mut blocks = Vec::new();
        let mut skipped = 0;

        for height in window_heights(from_height, window_size) {
            match self.fetch_block(height).await {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    skipped += 1;
                    let context = LogContext::new("block_scanner", "scan_recent_blocks").with_block_number(height);
                    if e.severity() == ErrorSeverity::Low {
                        context.warn(&format!("Skipping block {}: {}", height, e));
                    } else {
                        ErrorLogger::log_error(&e, Some(context));
                    }
                }
            }
        }

        MetricsLogger::log_scan_completed(from_height, window_size, blocks.len(), skipped);
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_heights_descending() {
        let heights: Vec<u64> = window_heights(1207, 5).collect();
        assert_eq!(heights, vec![1207, 1206, 1205, 1204, 1203]);
    }

    #[test]
    fn test_window_heights_single_block() {
        let heights: Vec<u64> = window_heights(42, 1).collect();
        assert_eq!(heights, vec![42]);
    }

    #[test]
    fn test_window_heights_stop_at_genesis() {
        let heights: Vec<u64> = window_heights(2, 5).collect();
        assert_eq!(heights, vec![2, 1, 0]);

        let heights: Vec<u64> = window_heights(0, 5).collect();
        assert_eq!(heights, vec![0]);
    }

    #[test]
    fn test_window_heights_empty_window() {
        assert_eq!(window_heights(1207, 0).count(), 0);
    }

    #[test]
    fn test_scanned_block_from_block() {
        let block = Block {
            number: "0x4b7".to_string(),
            timestamp: "0x5c0".to_string(),
            transactions: vec![],
        };

        let scanned = ScannedBlock::from_block(block).unwrap();
        assert_eq!(scanned.number, 1207);
        assert_eq!(scanned.timestamp, 1472);
        assert!(scanned.transactions.is_empty());
    }

    #[test]
    fn test_scanned_block_rejects_bad_header() {
        let block = Block {
            number: "1207".to_string(),
            timestamp: "0x5c0".to_string(),
            transactions: vec![],
        };

        assert!(ScannedBlock::from_block(block).is_err());
    }

    #[tokio::test]
    async fn test_scan_against_unreachable_node_returns_nothing() {
        let rpc_client = RpcClient::with_timeout("http://127.0.0.1:9", 1).unwrap();
        let scanner = BlockScanner::new(rpc_client);

        assert!(scanner.current_block_height().await.is_err());
        assert!(scanner.scan_recent_blocks(10, 3).await.is_empty());
    }
}
