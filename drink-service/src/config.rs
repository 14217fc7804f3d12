use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use common_auth::AuthConfig;

pub struct ServiceConfig {
    pub database_url: String,
    pub auth: AuthConfig,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

pub fn load() -> Result<ServiceConfig> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let domain = env::var("AUTH_DOMAIN").context("AUTH_DOMAIN must be set")?;
    let audience = env::var("AUTH_AUDIENCE").context("AUTH_AUDIENCE must be set")?;

    let mut auth = AuthConfig::for_domain(domain, audience);
    if let Ok(value) = env::var("AUTH_LEEWAY_SECONDS") {
        if let Ok(leeway) = value.parse::<u32>() {
            auth = auth.with_leeway(leeway);
        }
    }
    if let Ok(value) = env::var("JWKS_CACHE_SECONDS") {
        if let Ok(secs) = value.parse::<u64>() {
            auth = auth.with_cache_ttl(Duration::from_secs(secs));
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    // Default matches the Ionic dev server.
    let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:8100".to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    Ok(ServiceConfig {
        database_url,
        auth,
        host,
        port,
        cors_allowed_origins,
    })
}
