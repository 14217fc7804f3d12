use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderMap;

use crate::claims::Claims;
use crate::error::{AuthError, AuthResult, ClaimFault};
use crate::extract::bearer_token;
use crate::verifier::TokenVerifier;

/// Gate that lets a protected operation run only for callers holding a named
/// permission.
///
/// Per request the chain runs exactly once: extract the bearer token, verify
/// it, check the permission, then hand the verified claims to the operation.
/// The first failure is terminal and propagates unchanged.
#[derive(Clone)]
pub struct PermissionGuard {
    verifier: Arc<TokenVerifier>,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Extract, verify and check the permission. The claims come back only
    /// when the caller may proceed.
    pub async fn authorize(&self, headers: &HeaderMap, permission: &str) -> AuthResult<Claims> {
        let token = bearer_token(headers)?;
        let claims = self.verifier.verify(token).await?;

        // A token issued without permission scopes at all is a malformed
        // grant, not a denied one.
        let Some(granted) = claims.permissions.as_deref() else {
            return Err(AuthError::InvalidClaims(ClaimFault::MissingPermissions));
        };
        if !granted.iter().any(|entry| entry == permission) {
            return Err(AuthError::Unauthorized);
        }

        Ok(claims)
    }

    /// Higher-order form: the wrapped operation runs exactly once, receives
    /// the verified claims, and its output is returned untouched.
    pub async fn run<F, Fut, T>(
        &self,
        headers: &HeaderMap,
        permission: &str,
        op: F,
    ) -> AuthResult<T>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(headers, permission).await?;
        Ok(op(claims).await)
    }
}
