// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-key authentication middleware.
//!
//! Resolves `Authorization: Bearer <key>` through the configured
//! [`AuthAdapter`](nowgo_core::AuthAdapter) and stores the resulting
//! [`CallerId`] in the request extensions for handlers. Missing or unknown
//! keys are rejected with 401 (fail-closed).

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use nowgo_core::CallerId;

use crate::handlers::error_response;
use crate::server::GatewayState;

/// Extract the bearer token from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware that authenticates the caller and attaches its [`CallerId`].
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = bearer_token(request.headers()) else {
        nowgo_prometheus::record_admission_denied("unauthenticated");
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "missing bearer token",
        ));
    };

    let caller: CallerId = match state.auth.authenticate(token).await {
        Ok(Some(caller)) => caller,
        Ok(None) => {
            tracing::debug!("rejected request with unknown API key");
            nowgo_prometheus::record_admission_denied("unauthenticated");
            return Err(error_response(StatusCode::UNAUTHORIZED, "Invalid API key"));
        }
        Err(e) => {
            tracing::error!(error = %e, "authentication backend failed");
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "authentication unavailable",
            ));
        }
    };

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer demo-key-123")), Some("demo-key-123"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
