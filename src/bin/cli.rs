use clap::Parser;
use eth_tx_parser::api::{Cli, CliHandler};
use eth_tx_parser::config::AppConfig;
use eth_tx_parser::logging::init_logging;
use eth_tx_parser::parser::EthereumParser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(endpoint) = &cli.endpoint {
        config.rpc.endpoint = endpoint.clone();
        config.validate()?;
    }

    // Console output is the product here; keep diagnostics quiet unless asked for
    if std::env::var("LOG_LEVEL").is_err() {
        config.logging.level = "warn".to_string();
    }
    init_logging(&config.logging)?;

    let parser = EthereumParser::from_config(&config)?;
    let cli_handler = CliHandler::new(Arc::new(parser));

    match cli_handler.execute_command(&cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
