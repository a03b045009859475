use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    auth::{self, middleware::require_auth},
    config::AppConfig,
    error::AppError,
    movies,
    state::AppState,
};

pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut protected = Router::new()
        .merge(movies::handlers::read_routes())
        .merge(movies::handlers::write_routes())
        .merge(auth::handlers::account_routes());
    let mut public = Router::new()
        .merge(auth::handlers::auth_routes())
        .route("/health", get(|| async { "ok" }));

    if config.movies_write_requires_auth {
        protected = protected.merge(movies::handlers::create_routes());
    } else {
        public = public.merge(movies::handlers::create_routes());
    }

    let protected =
        protected.route_layer(from_fn_with_state(state.tokens.clone(), require_auth));

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
        .layer(cors_layer(&config))
        .layer(from_fn_with_state(config.request_timeout(), enforce_deadline))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

/// Drops the handler future once `limit` has passed and answers 503 with
/// the usual error body.
async fn enforce_deadline(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    tokio::time::timeout(limit, next.run(request))
        .await
        .map_err(|_| {
            warn!(?limit, "request deadline exceeded");
            AppError::Timeout
        })
}

/// Permissive when no origins are configured.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
