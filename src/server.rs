use axum::{
    Extension, Router,
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    Error, Res, api,
    api::{AppState, SharedState},
    config::Config,
};

/// Builds the router with every route, the CORS policy and the origin guard.
///
/// Only `allowed_origin` may call the service cross-origin, and only with GET
/// and PUT. Requests that carry any other `Origin` are answered with 403
/// before they reach a handler.
pub fn build_router(state: SharedState, allowed_origin: &str) -> Res<Router> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| Error::config(format!("invalid ALLOWED_ORIGIN {allowed_origin}: {e}")))?;

    let cors = CorsLayer::new()
        .allow_origin(origin.clone())
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/spotify", get(api::listening_state))
        .route("/spotify/auth", get(api::auth))
        .route("/spotify/callback", get(api::callback))
        .route("/spotify/pause", put(api::pause))
        .route("/spotify/play/{track_id}", put(api::play))
        .layer(Extension(state))
        .layer(middleware::from_fn_with_state(origin, reject_foreign_origin))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

async fn reject_foreign_origin(
    State(allowed): State<HeaderValue>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if origin != &allowed {
            let origin = origin.to_str().unwrap_or("<invalid>").to_string();
            warn!("Rejected {} {} from origin {}", request.method(), request.uri().path(), origin);
            return Error::OriginNotAllowed(origin).into_response();
        }
    }

    next.run(request).await
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let state = AppState::from_config(&config);
    let app = build_router(state, &config.allowed_origin)?;

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on {} (allowed origin: {})", addr, config.allowed_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
