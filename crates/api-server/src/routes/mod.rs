//! Route handlers

pub mod health_application;
pub mod membership;
pub mod status;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the full REST application
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(status::router())
        .merge(membership::router())
        .merge(health_application::router())
        .with_state(state);

    let router = if config.cors_permissive {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}
