//! # Extractors
//!
//! - [`RequireAuth`] - bearer-token auth gate for protected routes
//! - [`ApiJson`] - JSON body whose rejections use the API error envelope

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use shop_auth::SessionClaims;
use shop_core::ShopError;

/// Extractor that requires a valid session token.
///
/// Runs before any body extractor, so unauthenticated calls are rejected
/// with 401 before the payload is looked at.
///
/// ```rust,ignore
/// async fn protected(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", claims.name)
/// }
/// ```
pub struct RequireAuth(pub SessionClaims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| ShopError::unauthenticated("Unauthorized"))?;
        let claims = state.auth.tokens().verify(token)?;
        Ok(Self(claims))
    }
}

/// `Authorization: Bearer <token>`, scheme matched case-insensitively
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// `axum::Json` with rejections mapped to a 400 error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def.ghi"))), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&parts(Some("bearer abc"))), Some("abc"));
    }

    #[test]
    fn test_bearer_token_missing_or_wrong_scheme() {
        assert_eq!(bearer_token(&parts(None)), None);
        assert_eq!(bearer_token(&parts(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer   "))), None);
    }
}
