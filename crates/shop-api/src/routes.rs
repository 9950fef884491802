//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::error::ErrorResponse;
use crate::handlers;
use crate::state::{AppConfig, AppState};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

/// Create the main application router
///
/// Routes:
/// - GET  /health, GET / - Health check
/// - POST /api/auth/register - Register, returns `{token, user}`
/// - POST /api/auth/login - Log in, returns `{token, user}`
/// - GET  /api/auth/me - Current user (bearer token)
/// - GET  /api/products - Product list
/// - GET  /api/products/{id} - Single product
/// - POST /api/checkout/create-session - Hosted checkout (bearer token)
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let auth_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::me));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/products", get(handlers::list_products))
        .route("/products/{id}", get(handlers::get_product))
        .route(
            "/checkout/create-session",
            post(handlers::create_checkout_session),
        );

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        // Middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(AnyOrigin)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}

/// JSON 500 for a panicking handler; the process keeps serving
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error", 500)),
    )
        .into_response()
}
