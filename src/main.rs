#![forbid(unsafe_code)]

mod config;
mod router;

use std::{net::SocketAddr, sync::Arc};

use db::PgStore;
use dotenvy::dotenv;
use listenfd::ListenFd;
use web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut listenfd = ListenFd::from_env();

    let tcp_socket: Option<std::net::TcpListener> = match listenfd.take_tcp_listener(0) {
        Ok(socket) => socket,
        Err(_) => None,
    };

    let config = config::process_config()?;

    let store = PgStore::connect(&config.database.uri)?;
    store.run_migrations().await?; // run all pending migrations

    let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
    let state = Arc::new(AppState::new(Arc::new(store), config));

    let rpc_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(err) = rpc::start(rpc_state).await {
            log::error!("RPC server stopped: {:#}", err);
        }
    });

    let app = router::app(state);

    match tcp_socket {
        // cargo-watch thing
        Some(listener) => {
            axum::Server::from_tcp(listener)?
                .serve(app.into_make_service())
                .await?
        }
        None => {
            log::info!("Listening on {}", addr);
            axum::Server::bind(&addr)
                .serve(app.into_make_service())
                .await?
        }
    };

    Ok(())
}
