pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod permissions;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use common_auth::PermissionGuard;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub guard: Arc<PermissionGuard>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/drinks",
            get(handlers::list_drinks).post(handlers::create_drink),
        )
        .route("/drinks-detail", get(handlers::drinks_detail))
        .route(
            "/drinks/:id",
            axum::routing::patch(handlers::update_drink).delete(handlers::delete_drink),
        )
        .with_state(state)
}

pub async fn ensure_schema(db: &PgPool) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS drinks (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            recipe JSONB NOT NULL
        )",
    )
    .execute(db)
    .await?;
    Ok(())
}
