//! Route definitions

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers, middleware::propagate_request_id, state::AppState};

/// Create the router with all routes and no middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        // API
        .route("/api/tts", post(handlers::speech::text_to_speech))
        .route("/api/generate-tip", post(handlers::tips::generate_tip))
        // Attach state
        .with_state(state)
}

/// Create the router wrapped in the server middleware stack
///
/// Layers, outermost first: request id, tracing, CORS, body limit.
pub fn create_app(state: AppState) -> Router {
    let server = state.config.server.clone();
    let app = create_router(state).layer(RequestBodyLimitLayer::new(
        server.max_body_size_json_bytes,
    ));

    let app = if server.cors_enabled {
        app.layer(cors_layer(&server))
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(propagate_request_id))
}

/// CORS policy: allow-all when no origins are configured
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|o| {
            o.parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %o, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
