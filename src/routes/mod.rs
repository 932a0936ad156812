use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{form, predict};
use crate::middleware::rate_limit::{log_request, GlobalGovernorLayer};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Order form and prediction
    let api_routes = Router::new()
        .route("/form", get(form::form_schema))
        .route("/features", post(predict::derived_features))
        .route("/predict", post(predict::predict));

    Router::new()
        .route("/health", get(form::health))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Wrap the router with the server middleware. Request logging sits outside
/// the rate limiter so rejected requests are logged too.
pub fn with_middleware(router: Router, governor: GlobalGovernorLayer) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(governor)
        .layer(middleware::from_fn(log_request))
}
