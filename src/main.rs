mod assistant;
mod cache;
mod classify;
mod clients;
mod config;
mod courses;
mod crime;
mod geocode;
mod handlers;
mod map_geo;
mod net;
mod overpass;
mod session;
mod state;
mod travel_info;
mod types;

use std::sync::Arc;

use config::Config;
use state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new(&config)?);
    let app = handlers::router(state);

    info!("Running on {}", config.bind);

    axum::Server::bind(&config.bind)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
