use std::time::Duration;

/// Runtime configuration for token verification. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected issuer claim (iss).
    pub issuer: String,
    /// Endpoint publishing the issuer's signing keys.
    pub jwks_url: String,
    /// Expected audience claim (aud).
    pub audience: String,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
    /// Deadline for a single key-set fetch.
    pub fetch_timeout: Duration,
    /// How long a fetched key set is trusted before it is refetched.
    pub cache_ttl: Duration,
}

impl AuthConfig {
    /// Construct config from an explicit issuer and JWKS endpoint.
    pub fn new(
        issuer: impl Into<String>,
        jwks_url: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            jwks_url: jwks_url.into(),
            audience: audience.into(),
            leeway_seconds: 30,
            fetch_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
        }
    }

    /// Derive the issuer and JWKS endpoint from an Auth0-style tenant domain,
    /// e.g. `mycoffeeshop-project.us.auth0.com`.
    pub fn for_domain(domain: impl AsRef<str>, audience: impl Into<String>) -> Self {
        let domain = domain.as_ref().trim_matches('/');
        Self::new(
            format!("https://{domain}/"),
            format!("https://{domain}/.well-known/jwks.json"),
            audience,
        )
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Adjust the key-set fetch deadline.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Adjust how long fetched keys stay fresh. A zero TTL refetches on every
    /// verification.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
