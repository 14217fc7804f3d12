use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Drink, Ingredient};
use crate::permissions;
use crate::AppState;

pub async fn index() -> &'static str {
    "Here is my coffee"
}

async fn all_drinks(db: &PgPool) -> Result<Vec<Drink>, ServiceError> {
    let drinks = sqlx::query_as("SELECT id, title, recipe FROM drinks ORDER BY id")
        .fetch_all(db)
        .await?;
    Ok(drinks)
}

/// Public menu: short drink representations, no token needed.
pub async fn list_drinks(State(state): State<AppState>) -> ServiceResult<Json<Value>> {
    let drinks = all_drinks(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "drinks": drinks.iter().map(Drink::short).collect::<Vec<_>>(),
    })))
}

/// Barista view: long representations, gated on `get:drinks-detail`.
pub async fn drinks_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServiceResult<Json<Value>> {
    let db = state.db.clone();
    state
        .guard
        .run(&headers, permissions::GET_DRINKS_DETAIL, |_claims| async move {
            let drinks = all_drinks(&db).await?;
            Ok(Json(json!({
                "success": true,
                "drinks": drinks.iter().map(Drink::long).collect::<Vec<_>>(),
            })))
        })
        .await?
}

#[derive(Debug, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

pub async fn create_drink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewDrink>,
) -> ServiceResult<Json<Value>> {
    let db = state.db.clone();
    state
        .guard
        .run(&headers, permissions::POST_DRINKS, |_claims| async move {
            let drink: Drink = sqlx::query_as(
                "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
            )
            .bind(&body.title)
            .bind(sqlx::types::Json(&body.recipe))
            .fetch_one(&db)
            .await?;
            Ok(Json(json!({ "success": true, "drinks": [drink.long()] })))
        })
        .await?
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateDrink {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

pub async fn update_drink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<UpdateDrink>,
) -> ServiceResult<Json<Value>> {
    let db = state.db.clone();
    state
        .guard
        .run(&headers, permissions::PATCH_DRINKS, |_claims| async move {
            let drink: Drink = sqlx::query_as(
                "UPDATE drinks
                 SET title = COALESCE($2, title), recipe = COALESCE($3, recipe)
                 WHERE id = $1
                 RETURNING id, title, recipe",
            )
            .bind(id)
            .bind(body.title.as_deref())
            .bind(body.recipe.as_ref().map(sqlx::types::Json))
            .fetch_optional(&db)
            .await?
            .ok_or_else(|| common_http_errors::ApiError::not_found("drink"))?;
            Ok(Json(json!({ "success": true, "drinks": [drink.long()] })))
        })
        .await?
}

pub async fn delete_drink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> ServiceResult<Json<Value>> {
    let db = state.db.clone();
    state
        .guard
        .run(&headers, permissions::DELETE_DRINKS, |_claims| async move {
            let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
                .bind(id)
                .execute(&db)
                .await?;
            if result.rows_affected() == 0 {
                return Err(common_http_errors::ApiError::not_found("drink").into());
            }
            Ok(Json(json!({ "success": true, "delete": id })))
        })
        .await?
}
