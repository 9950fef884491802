//! # Request Handlers
//!
//! Axum request handlers for auth, catalog and checkout.

use crate::error::ApiError;
use crate::extract::{ApiJson, RequireAuth};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shop_auth::AuthSession;
use tracing::{info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Register request. Missing fields deserialize as blank and fail validation.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Checkout URL (redirect user here)
    pub url: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "storefront-bff",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_upstream": state.catalog.base_url(),
        "payments_configured": state.checkout.is_configured(),
    }))
}

/// Register a new user and return `{token, user}`
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let session = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;
    Ok(Json(session))
}

/// Log in and return a fresh `{token, user}`
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let session = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(session))
}

/// Decoded token claims of the caller
pub async fn me(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
    Json(json!({ "user": claims }))
}

/// Product list, normalized to a bare array
#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let products = state
        .catalog
        .list_products()
        .await
        .map_err(|e| ApiError::from(e).with_context("Failed to fetch products"))?;
    Ok(Json(products))
}

/// Single product, passed through unmodified
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let product = state
        .catalog
        .get_product(&product_id)
        .await
        .map_err(|e| ApiError::from(e).with_context("Failed to fetch product"))?;
    Ok(Json(product))
}

/// Create a hosted checkout session from `{"cartItems": [...]}`
///
/// The body is read raw so an unconfigured processor reports itself before
/// cart validation; a missing or non-JSON body fails as an empty cart.
#[instrument(skip(state, claims, body), fields(user_id = %claims.id))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    body: Bytes,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let url = state.checkout.create_session(&claims.user(), &body).await?;
    info!("Checkout session ready for user {}", claims.id);
    Ok(Json(CreateCheckoutResponse { url }))
}
