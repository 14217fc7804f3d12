use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuthError, AuthResult, ClaimFault};

/// Verified token payload, shaped for permission checks.
///
/// Only the verifier builds one of these; every instance has already passed
/// signature, audience, issuer and expiry validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claims {
    pub issuer: String,
    pub audience: Vec<String>,
    pub subject: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    /// `None` when the token carries no `permissions` claim at all, which is
    /// a different situation from an empty grant list.
    pub permissions: Option<Vec<String>>,
    /// Full decoded payload, for claims this record does not model.
    pub raw: Value,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|entry| entry == permission))
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    iss: String,
    #[serde(default)]
    aud: Option<AudienceRepr>,
    #[serde(default)]
    sub: Option<String>,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

// RFC 7519 allows aud as a single string or an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AudienceRepr {
    Single(String),
    Many(Vec<String>),
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or(AuthError::InvalidClaims(ClaimFault::Schema))?;

        let issued_at = match value.iat {
            Some(iat) => Some(
                Utc.timestamp_opt(iat, 0)
                    .single()
                    .ok_or(AuthError::InvalidClaims(ClaimFault::Schema))?,
            ),
            None => None,
        };

        let audience = match value.aud {
            Some(AudienceRepr::Single(item)) => vec![item],
            Some(AudienceRepr::Many(items)) => items,
            None => Vec::new(),
        };

        Ok(Self {
            issuer: value.iss,
            audience,
            subject: value.sub,
            expires_at,
            issued_at,
            permissions: value.permissions,
            raw: Value::Null,
        })
    }
}

impl TryFrom<Value> for Claims {
    type Error = AuthError;

    fn try_from(value: Value) -> AuthResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value.clone())
            .map_err(|_| AuthError::InvalidClaims(ClaimFault::Schema))?;
        let mut claims = Claims::try_from(repr)?;
        claims.raw = value;
        Ok(claims)
    }
}
