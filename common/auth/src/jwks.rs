use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};

/// Fetches the issuer's published key set over HTTPS.
#[derive(Clone)]
pub struct JwksClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl JwksClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the key set. Any transport failure, non-success status
    /// or undecodable body is `KeySetUnavailable`; an unusable individual
    /// entry (no kid, non-RSA, missing components) is skipped so one odd key
    /// cannot break verification against the rest of the set.
    pub async fn fetch(&self) -> AuthResult<Vec<(String, DecodingKey)>> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, url = %self.url, "JWKS fetch failed");
                AuthError::KeySetUnavailable
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %self.url, "JWKS endpoint returned an error");
            return Err(AuthError::KeySetUnavailable);
        }

        let body: JwksDocument = response.json().await.map_err(|err| {
            warn!(error = %err, url = %self.url, "JWKS response was not a valid key set");
            AuthError::KeySetUnavailable
        })?;

        let mut keys = Vec::new();
        for entry in body.keys {
            let Some(kid) = entry.kid else {
                debug!("skipping JWKS entry without kid");
                continue;
            };
            let kty = entry.kty.as_deref().unwrap_or("RSA");
            if kty != "RSA" {
                debug!(kid, kty, "skipping non-RSA JWKS entry");
                continue;
            }
            if let Some(alg) = entry.alg.as_deref() {
                if alg != "RS256" {
                    debug!(kid, alg, "skipping JWKS entry with unsupported alg");
                    continue;
                }
            }
            let (Some(modulus), Some(exponent)) = (entry.n, entry.e) else {
                warn!(kid, "skipping JWKS entry missing RSA components");
                continue;
            };
            match DecodingKey::from_rsa_components(&modulus, &exponent) {
                Ok(key) => keys.push((kid, key)),
                Err(err) => {
                    warn!(kid, error = %err, "skipping JWKS entry with unusable RSA components");
                }
            }
        }

        debug!(count = keys.len(), url = %self.url, "fetched JWKS key set");
        Ok(keys)
    }
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<JwkEntry>,
}

#[derive(Debug, Deserialize)]
struct JwkEntry {
    kid: Option<String>,
    kty: Option<String>,
    alg: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

struct Snapshot {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Thread-safe kid -> decoding key map with explicit expiry.
///
/// A fresh snapshot answers lookups without touching the network; once the
/// TTL lapses the next lookup refetches the whole set. A kid absent from a
/// fresh snapshot is `KeyNotFound` without a second fetch.
pub struct KeyCache {
    client: JwksClient,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl KeyCache {
    pub fn new(client: JwksClient, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    pub async fn resolve(&self, kid: &str) -> AuthResult<DecodingKey> {
        {
            let guard = self.snapshot.read().expect("rwlock poisoned");
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.fetched_at.elapsed() < self.ttl {
                    return snapshot
                        .keys
                        .get(kid)
                        .cloned()
                        .ok_or(AuthError::KeyNotFound);
                }
            }
        }

        let fetched = self.client.fetch().await?;
        let snapshot = Snapshot {
            keys: fetched.into_iter().collect(),
            fetched_at: Instant::now(),
        };
        let key = snapshot.keys.get(kid).cloned();
        *self.snapshot.write().expect("rwlock poisoned") = Some(snapshot);
        key.ok_or(AuthError::KeyNotFound)
    }
}
