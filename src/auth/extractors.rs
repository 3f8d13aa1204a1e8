use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{auth::jwt::JwtKeys, error::ApiError};

/// Identity resolved from a verified bearer token. Every guarded request
/// re-derives it from the header; nothing is cached server-side.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// Pull the token out of an `Authorization` header value. The scheme
/// word matches case-insensitively; everything after the single space is
/// the token.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = bearer_token(header).ok_or(ApiError::Unauthenticated)?;

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|err| {
            warn!(%err, "rejected bearer token");
            ApiError::Unauthenticated
        })?;

        // A valid signature over a payload that names no user is still
        // not an identity.
        let Some(id) = claims.sub else {
            warn!("verified token carries no subject");
            return Err(ApiError::Unauthenticated);
        };

        Ok(AuthUser {
            id,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_matches_case_insensitively() {
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert_eq!(bearer_token("Token abc"), None);
        assert_eq!(bearer_token("Basic dXNlcjpwdw=="), None);
    }

    #[test]
    fn missing_or_empty_token_is_rejected() {
        assert_eq!(bearer_token("bearer"), None);
        assert_eq!(bearer_token("bearer "), None);
    }
}
