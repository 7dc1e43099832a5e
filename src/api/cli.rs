use clap::{Parser, Subcommand};
use std::sync::Arc;
use thiserror::Error;

use crate::error::ParserError;
use crate::models::Transaction;
use crate::parser::EthereumParser;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Parser(#[from] ParserError),
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "eth-tx-parser")]
#[command(about = "Query the latest block and recent transactions of an Ethereum address")]
#[command(version)]
pub struct Cli {
    /// JSON-RPC endpoint, overrides the configured one
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the current block number
    CurrentBlock,
    /// Subscribe to an address
    Subscribe { address: String },
    /// Print recent transactions from or to an address
    Transactions { address: String },
}

pub struct CliHandler {
    parser: Arc<EthereumParser>,
}

impl CliHandler {
    pub fn new(parser: Arc<EthereumParser>) -> Self {
        Self { parser }
    }

    /// Run `command` and return the text to print
    pub async fn execute_command(&self, command: &Commands) -> Result<String, CliError> {
        match command {
            Commands::CurrentBlock => {
                let block = self.parser.get_current_block().await?;
                Ok(format_current_block(block))
            }
            Commands::Subscribe { address } => {
                let subscribed = self.parser.subscribe(address);
                Ok(format_subscription(address, subscribed))
            }
            Commands::Transactions { address } => {
                let transactions = self.parser.get_transactions(address).await?;
                format_transactions(address, &transactions)
            }
        }
    }
}

pub fn format_current_block(block: u64) -> String {
    format!("Current Block: {}", block)
}

pub fn format_subscription(address: &str, subscribed: bool) -> String {
    if subscribed {
        format!("Subscribed to address: {}", address)
    } else {
        format!("Already subscribed to address: {}", address)
    }
}

pub fn format_transactions(address: &str, transactions: &[Transaction]) -> Result<String, CliError> {
    let output = serde_json::to_string_pretty(transactions)?;
    Ok(format!("Transactions for address {}:\n{}", address, output))
}
