use clap::Parser;
use eth_tx_parser::api::ApiServer;
use eth_tx_parser::config::AppConfig;
use eth_tx_parser::logging::init_logging;
use eth_tx_parser::parser::EthereumParser;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "eth-tx-parser-server")]
#[command(about = "HTTP API for the current block, address subscriptions and recent transactions")]
#[command(version)]
struct Args {
    /// JSON-RPC endpoint, overrides the configured one
    #[arg(long)]
    endpoint: Option<String>,

    /// Bind address, overrides the configured one
    #[arg(long)]
    host: Option<String>,

    /// Server port, overrides the configured one
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(endpoint) = args.endpoint {
        config.rpc.endpoint = endpoint;
    }
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    config.validate()?;

    init_logging(&config.logging)?;

    let parser = Arc::new(EthereumParser::from_config(&config)?);
    let server = ApiServer::new(parser, config.api.host.clone(), config.api.port);

    log::info!("Using JSON-RPC endpoint {}", config.rpc.endpoint);

    if let Err(e) = server.start().await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
