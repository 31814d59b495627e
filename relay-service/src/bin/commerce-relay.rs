#[path = "commerce-relay/cli.rs"]
mod cli;
#[path = "commerce-relay/setup.rs"]
mod setup;

use crate::cli::Cli;
use log::info;
use relay_service::api::router::run_http_server;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse_args();
    setup::init_logging(&args.log_level)?;
    args.apply_to_env();
    info!("commerce-relay starting log_level={}", args.log_level);

    let mut config = setup::load_app_config()?;
    if let Some(listen) = &args.listen {
        config.server.listen_addr = listen.clone();
    }
    setup::log_startup_banner(&config);

    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .map_err(|err| format!("invalid server.listen_addr {}: {}", config.server.listen_addr, err))?;
    let state = setup::build_state(&config)?;

    run_http_server(addr, state).await?;
    Ok(())
}
