//! Authentication extraction.
//!
//! The upstream identity gateway authenticates the caller and forwards the
//! identity as a bearer token whose payload is base64url-encoded JSON claims
//! (`sub`, `email`). Token verification happens at the gateway; this layer
//! only unpacks the claims into an explicit [`AuthUser`] that handlers take
//! as a parameter. A missing or malformed token is 401.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::ApiError;

/// Authenticated caller for the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Opaque user id from the identity provider.
    pub user_id: String,
    pub email: String,
}

impl AuthUser {
    /// Default display name for a lazily created profile.
    pub fn nickname(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
    email: String,
}

/// Decode the bearer token payload into an [`AuthUser`].
pub fn decode_bearer(token: &str) -> Option<AuthUser> {
    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    if claims.sub.is_empty() || claims.email.is_empty() {
        return None;
    }
    Some(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        decode_bearer(token).ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(sub: &str, email: &str) -> String {
        URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}","email":"{email}"}}"#))
    }

    #[test]
    fn decodes_valid_claims() {
        let user = decode_bearer(&token("user-1", "one@example.com")).unwrap();
        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.email, "one@example.com");
        assert_eq!(user.nickname(), "one");
    }

    #[test]
    fn rejects_garbage_and_empty_claims() {
        assert!(decode_bearer("not base64 at all!").is_none());
        assert!(decode_bearer(&URL_SAFE_NO_PAD.encode(b"{}")).is_none());
        assert!(decode_bearer(&token("", "one@example.com")).is_none());
        assert!(decode_bearer(&token("user-1", "")).is_none());
    }
}
