pub mod block_scanner;
pub mod hex;
pub mod rpc_client;
pub mod transaction_filter;

pub use block_scanner::{window_heights, BlockScanner, ScannedBlock};
pub use hex::{hex_to_int, hex_to_int_or_zero, int_to_hex};
pub use rpc_client::{Block, RawTransaction, RpcClient};
pub use transaction_filter::{transactions_for_address, TransactionFilter};
