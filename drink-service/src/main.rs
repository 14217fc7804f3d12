use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use common_auth::{PermissionGuard, TokenVerifier};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use drink_service::{config, ensure_schema, router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cfg = config::load()?;

    let db = PgPool::connect(&cfg.database_url).await?;
    ensure_schema(&db).await?;

    let verifier = Arc::new(TokenVerifier::new(cfg.auth.clone()));
    let guard = Arc::new(PermissionGuard::new(verifier));
    info!(
        issuer = %cfg.auth.issuer,
        audience = %cfg.auth.audience,
        "token verifier initialised"
    );

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            cfg.cors_allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION]);

    let app = router(AppState { db, guard }).layer(cors);

    let ip: IpAddr = cfg.host.parse()?;
    let addr = SocketAddr::from((ip, cfg.port));
    info!(%addr, "starting drink-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
