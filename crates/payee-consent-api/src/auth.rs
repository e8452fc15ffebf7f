//! # Caller Credential Extraction
//!
//! The broker does not judge credentials itself: it pulls the caller's
//! bearer off the request and hands it to the token service for
//! introspection.
//!
//! ```text
//! Authorization: Bearer <token>    : preferred
//! ?token=<token>                   : fallback for browser redirects
//! ```

use std::convert::Infallible;

use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the caller's credential from the request.
///
/// The `Authorization` header wins when it carries a non-empty Bearer
/// token. Any other scheme falls through to the `token` query parameter.
pub fn extract_token(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
            .filter(|t| !t.is_empty())
    })
}

// ── BearerCredential ────────────────────────────────────────────────────────

/// Credential presented by the caller, if any.
///
/// Never rejects: an absent credential is the handler's call to make, so
/// that it is answered before the body is even looked at.
#[derive(Clone)]
pub struct BearerCredential(pub Option<String>);

impl std::fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BearerCredential")
            .field(&self.0.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for BearerCredential {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_token(&parts.headers, parts.uri.query())))
    }
}
