use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult, ClaimFault};
use crate::jwks::{JwksClient, KeyCache};

/// Verifies bearer tokens against the issuer's published signing keys.
///
/// Key resolution happens inside the verification path: a cache miss fetches
/// the key set from the issuer under the configured deadline, so no
/// background task is needed and every failure surfaces as a typed
/// `AuthError` on the request that hit it.
pub struct TokenVerifier {
    config: AuthConfig,
    keys: KeyCache,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig) -> Self {
        let client = JwksClient::new(config.jwks_url.clone(), config.fetch_timeout);
        let keys = KeyCache::new(client, config.cache_ttl);
        Self { config, keys }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub async fn verify(&self, token: &str) -> AuthResult<Claims> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidHeader)?;
        let kid = header.kid.ok_or(AuthError::InvalidHeader)?;
        let key = self.keys.resolve(&kid).await?;

        // RS256 only; "none" and HMAC algorithms are never accepted.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.leeway = self.config.leeway_seconds.into();

        let token_data = decode::<Value>(token, &key, &validation).map_err(classify)?;
        let claims = Claims::try_from(token_data.claims)?;
        debug!(kid, "token verified");
        Ok(claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience => AuthError::InvalidClaims(ClaimFault::Audience),
        ErrorKind::InvalidIssuer => AuthError::InvalidClaims(ClaimFault::Issuer),
        _ => AuthError::VerificationFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::Utc;
    use httpmock::prelude::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
    use rsa::rand_core::OsRng;
    use rsa::traits::PublicKeyParts;
    use rsa::RsaPrivateKey;
    use serde::Serialize;
    use std::time::Duration;

    #[derive(Serialize)]
    struct TokenClaims<'a> {
        iss: &'a str,
        aud: &'a str,
        sub: &'a str,
        exp: i64,
        iat: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        permissions: Option<&'a [&'a str]>,
    }

    struct KeyMaterial {
        encoding: EncodingKey,
        modulus: String,
        exponent: String,
    }

    fn generate_key_material() -> KeyMaterial {
        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("key generation");
        let public_key = private_key.to_public_key();

        let private_pem = private_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("private pem");
        let encoding = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("encoding key");
        let modulus = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let exponent = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

        KeyMaterial {
            encoding,
            modulus,
            exponent,
        }
    }

    fn mount_jwks(server: &MockServer, kid: &str, material: &KeyMaterial) {
        let body = serde_json::json!({
            "keys": [
                {
                    "kid": kid,
                    "kty": "RSA",
                    "use": "sig",
                    "alg": "RS256",
                    "n": material.modulus,
                    "e": material.exponent
                }
            ]
        });
        server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .body(body.to_string());
        });
    }

    fn verifier_for(server: &MockServer, issuer: &str, audience: &str) -> TokenVerifier {
        let config = AuthConfig::new(issuer, format!("{}/jwks", server.base_url()), audience)
            .with_fetch_timeout(Duration::from_secs(2));
        TokenVerifier::new(config)
    }

    fn issue_token(
        material: &KeyMaterial,
        kid: &str,
        issuer: &str,
        audience: &str,
        exp_offset: i64,
        permissions: Option<&[&str]>,
    ) -> String {
        let issued_at = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: issuer,
            aud: audience,
            sub: "auth0|barista",
            exp: issued_at + exp_offset,
            iat: issued_at,
            permissions,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        encode(&header, &claims, &material.encoding).expect("sign token")
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let material = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "test-key", &material);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        let token = issue_token(
            &material,
            "test-key",
            "https://issuer.test/",
            "coffee",
            600,
            Some(&["get:drinks-detail"]),
        );
        let claims = verifier.verify(&token).await.expect("verification");

        assert_eq!(claims.issuer, "https://issuer.test/");
        assert_eq!(claims.audience, vec!["coffee".to_string()]);
        assert_eq!(claims.subject.as_deref(), Some("auth0|barista"));
        assert!(claims.has_permission("get:drinks-detail"));
    }

    #[tokio::test]
    async fn rejects_token_without_kid() {
        let material = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "test-key", &material);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        let claims = TokenClaims {
            iss: "https://issuer.test/",
            aud: "coffee",
            sub: "auth0|barista",
            exp: Utc::now().timestamp() + 600,
            iat: Utc::now().timestamp(),
            permissions: None,
        };
        let token =
            encode(&Header::new(Algorithm::RS256), &claims, &material.encoding).expect("sign");

        let err = verifier.verify(&token).await.expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidHeader));
    }

    #[tokio::test]
    async fn rejects_unknown_kid_before_signature_check() {
        let material = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "published-key", &material);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        let token = issue_token(
            &material,
            "rotated-away",
            "https://issuer.test/",
            "coffee",
            600,
            None,
        );
        let err = verifier.verify(&token).await.expect_err("should reject");
        assert!(matches!(err, AuthError::KeyNotFound));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let material = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "test-key", &material);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        // Well past the default 30s leeway.
        let token = issue_token(
            &material,
            "test-key",
            "https://issuer.test/",
            "coffee",
            -600,
            Some(&["get:drinks-detail"]),
        );
        let err = verifier.verify(&token).await.expect_err("should reject");
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn rejects_wrong_audience() {
        let material = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "test-key", &material);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        let token = issue_token(
            &material,
            "test-key",
            "https://issuer.test/",
            "tea",
            600,
            None,
        );
        let err = verifier.verify(&token).await.expect_err("should reject");
        assert!(matches!(
            err,
            AuthError::InvalidClaims(ClaimFault::Audience)
        ));
    }

    #[tokio::test]
    async fn rejects_wrong_issuer() {
        let material = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "test-key", &material);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        let token = issue_token(
            &material,
            "test-key",
            "https://impostor.test/",
            "coffee",
            600,
            None,
        );
        let err = verifier.verify(&token).await.expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidClaims(ClaimFault::Issuer)));
    }

    #[tokio::test]
    async fn rejects_token_signed_by_another_key() {
        let published = generate_key_material();
        let rogue = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "test-key", &published);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        let token = issue_token(
            &rogue,
            "test-key",
            "https://issuer.test/",
            "coffee",
            600,
            None,
        );
        let err = verifier.verify(&token).await.expect_err("should reject");
        assert!(matches!(err, AuthError::VerificationFailed));
    }

    #[tokio::test]
    async fn verification_is_idempotent() {
        let material = generate_key_material();
        let server = MockServer::start();
        mount_jwks(&server, "test-key", &material);
        let verifier = verifier_for(&server, "https://issuer.test/", "coffee");

        let token = issue_token(
            &material,
            "test-key",
            "https://issuer.test/",
            "coffee",
            600,
            Some(&["post:drinks"]),
        );
        let first = verifier.verify(&token).await.expect("first verification");
        let second = verifier.verify(&token).await.expect("second verification");
        assert_eq!(first, second);
    }
}
