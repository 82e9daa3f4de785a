use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::consumption::repo::ConsumptionEntry;
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

use super::dto::{CreateUserRequest, UpdateLimitRequest};
use super::repo::User;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/limit", put(update_limit))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = User::list(&state.db).await?;
    Ok(Json(json!({ "users": users })))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_user = payload.validate()?;

    if User::find_by_username(&state.db, &new_user.username)
        .await?
        .is_some()
    {
        warn!(username = %new_user.username, "username already taken");
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    let user = User::create(&state.db, &new_user).await?;
    info!(user_id = user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

#[instrument(skip(state, payload))]
pub async fn update_limit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateLimitRequest>,
) -> Result<Json<Value>, ApiError> {
    let limit = payload.validate()?;
    let user = User::update_limit(&state.db, id, limit)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    info!(user_id = id, daily_caffeine_limit = limit, "limit updated");
    Ok(Json(json!({ "user": user })))
}

/// Deletes the user's consumption history first, then the account. The two
/// statements are not wrapped in a transaction; a failure in between leaves
/// the user without history rather than the other way around.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let removed = ConsumptionEntry::delete_by_user(&state.db, id).await?;
    User::delete(&state.db, id).await?;
    info!(user_id = id, consumption_rows = removed, "user deleted");
    Ok(Json(json!({ "message": "User account deleted" })))
}
