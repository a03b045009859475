mod app;
mod auth;
mod config;
mod db;
mod error;
#[cfg(test)]
mod memory;
mod movies;
mod state;
mod validation;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "movie_catalog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        environment = ?config.environment,
        movies_write_requires_auth = config.movies_write_requires_auth,
        cors_origins = config.cors_allowed_origins.len(),
        "starting movie catalog"
    );

    let app_state = AppState::init(config).await?;
    let config = app_state.config.clone();
    let app = app::build_app(app_state);
    app::serve(app, &config).await
}
