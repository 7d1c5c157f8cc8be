use std::sync::Arc;

use emserve::config::{self, AppState, Config};
use emserve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file path as the only argument
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Every connection runs on this thread; file reads use the blocking pool
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    logger::log_server_start(listener.local_addr()?.port());
    logger::log_startup_details(&addr, state.handler.root(), &cfg);

    // Connections are spawned with spawn_local
    let local = tokio::task::LocalSet::new();
    local.run_until(server::start_server_loop(listener, state)).await;
    Ok(())
}
