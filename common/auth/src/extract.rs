use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::error::{AuthError, AuthResult};

/// Pulls the bearer token out of the `Authorization` header.
///
/// The value must split into exactly two whitespace-separated parts, scheme
/// then token, and the scheme must be `Bearer` (case-insensitive per
/// RFC 7235). The token is returned untouched; no decoding happens here.
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let raw = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = raw.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MalformedHeader)?;
    let token = parts.next().ok_or(AuthError::MalformedHeader)?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}
