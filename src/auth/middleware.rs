//! Axum middleware for session resolution.
//!
//! The middleware runs strictly before every gated handler. It resolves the
//! `Authorization` header into a [`Principal`] request extension; resolution
//! failures (malformed, unknown or expired tokens) terminate the request
//! here with 401. Absence of credentials is not a failure — the anonymous
//! principal flows on and is judged by the authorization policy.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info_span, warn, Instrument};

use crate::api::error::ApiError;
use crate::auth::session::SessionResolver;

pub type ResolverState = Arc<SessionResolver>;

/// Middleware entry point that resolves the caller's principal.
pub async fn resolve_principal(
    State(resolver): State<ResolverState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("session_middleware.resolve", http.method = %method, http.path = %path);

    let header: Option<String> = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    async move {
        match resolver.resolve(header.as_deref()).await {
            Ok(principal) => {
                request.extensions_mut().insert(principal);
                Ok(next.run(request).await)
            }
            Err(err) => {
                warn!(error = %err, "session resolution failed");
                Err(ApiError::from(err))
            }
        }
    }
    .instrument(span)
    .await
}
