use thiserror::Error;

/// Main error type for the Ethereum transaction parser
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures reaching the JSON-RPC endpoint or reading its response body
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("HTTP error: status {status}")]
    Status { status: u16 },

    #[error("HTTP client could not be built: {0}")]
    ClientBuild(String),
}

/// Malformed RPC responses: wrong shape, missing fields, bad hex
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hex value: {0:?}")]
    InvalidHex(String),

    #[error("RPC method error: code={code}, message={message}")]
    Rpc { code: i64, message: String },

    #[error("No result in response to {method}")]
    MissingResult { method: String },

    #[error("Block not found: {block_number}")]
    BlockNotFound { block_number: u64 },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not readable: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ParserError>;

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The process cannot do useful work until this is fixed
    Critical,
    /// A whole operation failed
    High,
    /// Part of an operation was degraded (e.g. one block skipped)
    Medium,
    /// Mostly informational
    Low,
}

impl ParserError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ParserError::Config(_) => ErrorSeverity::Critical,
            ParserError::Transport(TransportError::ClientBuild(_)) => ErrorSeverity::Critical,

            ParserError::Transport(TransportError::Connection(_)) => ErrorSeverity::High,
            ParserError::Transport(TransportError::Http(_)) => ErrorSeverity::High,

            ParserError::Transport(TransportError::Timeout { .. }) => ErrorSeverity::Medium,
            ParserError::Transport(TransportError::Status { .. }) => ErrorSeverity::Medium,
            ParserError::Decode(DecodeError::Rpc { .. }) => ErrorSeverity::Medium,
            ParserError::Decode(DecodeError::Json(_)) => ErrorSeverity::Medium,
            ParserError::Decode(DecodeError::InvalidResponse(_)) => ErrorSeverity::Medium,
            ParserError::Decode(DecodeError::MissingResult { .. }) => ErrorSeverity::Medium,

            ParserError::Decode(DecodeError::InvalidHex(_)) => ErrorSeverity::Low,
            ParserError::Decode(DecodeError::BlockNotFound { .. }) => ErrorSeverity::Low,
        }
    }

    /// Whether a caller-side retry could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            ParserError::Transport(TransportError::ClientBuild(_)) => false,
            ParserError::Transport(TransportError::Status { status }) => *status >= 500 || *status == 429,
            ParserError::Transport(_) => true,
            ParserError::Decode(DecodeError::BlockNotFound { .. }) => true,
            ParserError::Decode(_) => false,
            ParserError::Config(_) => false,
        }
    }

    /// Short machine-readable code, used in logs and HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ParserError::Transport(_) => "transport_error",
            ParserError::Decode(_) => "decode_error",
            ParserError::Config(_) => "config_error",
        }
    }
}
