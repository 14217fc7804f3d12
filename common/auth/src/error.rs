use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Which part of an otherwise decodable claim set was rejected.
///
/// All faults serialize under the single `invalid_claims` code but they do
/// not share a status: a token whose audience or issuer is wrong is an
/// authentication failure (401), while a payload that does not fit the claim
/// schema or was issued without permission scopes is a request the caller
/// needs to fix (400).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimFault {
    Audience,
    Issuer,
    Schema,
    MissingPermissions,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingHeader,
    #[error("authorization header malformed")]
    MalformedHeader,
    #[error("token header malformed or missing kid")]
    InvalidHeader,
    #[error("no signing key matches the token kid")]
    KeyNotFound,
    #[error("signing key set unavailable")]
    KeySetUnavailable,
    #[error("token expired")]
    TokenExpired,
    #[error("token claims rejected")]
    InvalidClaims(ClaimFault),
    #[error("token verification failed")]
    VerificationFailed,
    #[error("permission not granted")]
    Unauthorized,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::InvalidHeader => "invalid_header",
            AuthError::KeyNotFound => "key_not_found",
            AuthError::KeySetUnavailable => "key_set_unavailable",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::VerificationFailed => "verification_failed",
            AuthError::Unauthorized => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader
            | AuthError::InvalidHeader
            | AuthError::TokenExpired
            | AuthError::VerificationFailed
            | AuthError::InvalidClaims(ClaimFault::Audience)
            | AuthError::InvalidClaims(ClaimFault::Issuer) => StatusCode::UNAUTHORIZED,
            AuthError::KeyNotFound
            | AuthError::InvalidClaims(ClaimFault::Schema)
            | AuthError::InvalidClaims(ClaimFault::MissingPermissions) => StatusCode::BAD_REQUEST,
            AuthError::KeySetUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Unauthorized => StatusCode::FORBIDDEN,
        }
    }

    /// Fixed wire-facing description. Never interpolates token contents, key
    /// material or upstream error text.
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "Authorization header is expected.",
            AuthError::MalformedHeader => "Authorization header must be 'Bearer <token>'.",
            AuthError::InvalidHeader => "Authorization token header is malformed.",
            AuthError::KeyNotFound => "Unable to find the appropriate key.",
            AuthError::KeySetUnavailable => "Signing keys could not be fetched.",
            AuthError::TokenExpired => "Token expired.",
            AuthError::InvalidClaims(ClaimFault::Audience) => {
                "Incorrect claims. Please check the audience."
            }
            AuthError::InvalidClaims(ClaimFault::Issuer) => {
                "Incorrect claims. Please check the issuer."
            }
            AuthError::InvalidClaims(ClaimFault::Schema) => {
                "Token payload has an unexpected shape."
            }
            AuthError::InvalidClaims(ClaimFault::MissingPermissions) => {
                "Permissions not included in token."
            }
            AuthError::VerificationFailed => "Unable to verify the authentication token.",
            AuthError::Unauthorized => "Permission not found.",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    description: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            description: self.description(),
        };
        (self.status(), Json(body)).into_response()
    }
}
