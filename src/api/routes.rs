use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::shortener::Shortener;

use super::auth::{api_key_middleware, ApiKeyGuard};
use super::handlers::{health_check, redirect_to_url, shorten, AppState};

pub fn create_router(shortener: Shortener, config: Arc<Config>) -> Router {
    let guard = Arc::new(ApiKeyGuard::new(&config.api_key));
    let state = Arc::new(AppState { shortener, config });

    let protected_routes = Router::new()
        .route("/shorten", post(shorten))
        .route_layer(middleware::from_fn(move |headers, req, next| {
            let guard = Arc::clone(&guard);
            api_key_middleware(guard, headers, req, next)
        }))
        .with_state(Arc::clone(&state));

    Router::new()
        .route("/health", get(health_check))
        .route("/{code}", get(redirect_to_url))
        .with_state(state)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
}
