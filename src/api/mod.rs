pub mod cli;
pub mod http;

pub use cli::{Cli, CliError, CliHandler, Commands};
pub use http::{
    get_current_block, get_transactions, router, subscribe, ApiError, ApiServer, AppState, CurrentBlockResponse,
    ErrorResponse, SubscribeResponse,
};
