pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;

pub use blockchain::{hex_to_int, int_to_hex, BlockScanner, RpcClient, ScannedBlock, TransactionFilter};
pub use config::{ApiConfig, AppConfig, LoggingConfig, RpcConfig, ScanConfig};
pub use error::{ConfigError, DecodeError, ParserError, Result, TransportError};
pub use logging::{init_logging, ErrorLogger, LogContext, MetricsLogger, PerformanceMonitor};
pub use models::{SubscriptionRegistry, Transaction};
pub use parser::EthereumParser;
