//! # API Errors
//!
//! Converts [`ShopError`] into the JSON error envelope every route returns:
//! `{"message", "code", "url"?, "status"?, "details"?}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shop_core::ShopError;
use tracing::{debug, error, warn};

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
            url: None,
            status: None,
            details: None,
        }
    }
}

/// Handler error: a [`ShopError`] plus an optional caller-facing summary
#[derive(Debug)]
pub struct ApiError {
    error: ShopError,
    context: Option<&'static str>,
}

impl ApiError {
    /// Replace the top-level message (upstream details stay in `details`)
    pub fn with_context(mut self, context: &'static str) -> Self {
        self.context = Some(context);
        self
    }

    fn body(&self) -> ErrorResponse {
        let code = self.error.status_code();
        match &self.error {
            ShopError::Upstream(upstream) => ErrorResponse {
                message: self.context.unwrap_or("Upstream request failed").to_string(),
                code,
                url: Some(upstream.url.clone()),
                status: upstream.status,
                details: Some(upstream.message.clone()),
            },
            other => {
                let message = self
                    .context
                    .map(str::to_string)
                    .unwrap_or_else(|| other.client_message());
                ErrorResponse::new(message, code)
            }
        }
    }
}

impl From<ShopError> for ApiError {
    fn from(error: ShopError) -> Self {
        Self {
            error,
            context: None,
        }
    }
}

impl From<shop_core::UpstreamError> for ApiError {
    fn from(error: shop_core::UpstreamError) -> Self {
        ShopError::from(error).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ShopError::validation(format!("Invalid request body: {}", rejection.body_text())).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error.status_code();
        match &self.error {
            ShopError::InvalidToken(detail) => debug!("Rejected token: {}", detail),
            e if code >= 500 => error!("Request failed: {}", e),
            e => warn!("Request rejected ({}): {}", code, e),
        }

        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}
