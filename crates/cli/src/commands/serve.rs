use clap::Args;
use common::config::loader::read_config;
use common::error::GatewayError;
use gateway_web::{run_backend, AppState, BackendConfig};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to. Defaults to `server.addr`
    #[arg(long)]
    pub addr: Option<String>,
}

pub fn handle_serve(args: ServeArgs, config_path: Option<PathBuf>) -> Result<(), GatewayError> {
    let cfg = read_config(config_path).map_err(GatewayError::init)?;
    let state = AppState::from_config(&cfg)?;
    let addr = args.addr.unwrap_or_else(|| cfg.server.addr.clone());

    let rt = Runtime::new().map_err(GatewayError::run)?;
    rt.block_on(run_backend(state, BackendConfig { addr }))
        .map_err(GatewayError::run)
}
