use axum::Router;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{config::Config, errors::Result, routes::api_router, state::AppState};

pub mod config;
pub mod consts;
pub mod core;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    tracing::subscriber::set_global_default(FmtSubscriber::default()).unwrap();
    let config = Config::load();
    let port = config.port;
    let state = AppState::init(config).await?;

    info!("Starting server");

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Serving identity core at http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_router(state.clone()))
        .with_state(state)
}
