use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::beverages::repo::Beverage;
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;
use crate::users::repo::User;

use super::dto::{
    LogConsumptionRequest, StatsResponse, TodayResponse, UpdateConsumptionRequest,
};
use super::repo::ConsumptionEntry;
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/consumption", get(all_consumption))
        .route("/users/:id/consumption/today", get(consumption_today))
        .route("/users/:id/consumption/weekly", get(consumption_weekly))
        .route("/users/:id/stats", get(user_stats))
        .route("/users/:id/consumptions", post(log_consumption))
        .route(
            "/users/:id/consumptions/:log_id",
            put(update_consumption).delete(delete_consumption),
        )
}

/// Admin view over the whole log, across all users.
#[instrument(skip(state))]
pub async fn all_consumption(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let entries = ConsumptionEntry::list_all(&state.db).await?;
    Ok(Json(json!({ "consumptions": entries })))
}

#[instrument(skip(state, payload))]
pub async fn log_consumption(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiJson(payload): ApiJson<LogConsumptionRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_entry = payload.validate()?;

    if User::find(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }
    if Beverage::find(&state.db, new_entry.beverage_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Beverage not found".into()));
    }

    let entry = ConsumptionEntry::create(
        &state.db,
        user_id,
        new_entry.beverage_id,
        new_entry.serving_count,
    )
    .await?;
    info!(
        entry_id = entry.id,
        user_id,
        beverage_id = entry.beverage_id,
        serving_count = entry.serving_count,
        "consumption logged"
    );
    Ok((StatusCode::CREATED, Json(json!({ "consumption": entry }))))
}

#[instrument(skip(state, payload))]
pub async fn update_consumption(
    State(state): State<AppState>,
    Path((user_id, log_id)): Path<(i64, i64)>,
    ApiJson(payload): ApiJson<UpdateConsumptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let serving_count = payload.validate()?;

    let entry = ConsumptionEntry::find(&state.db, log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Consumption entry not found".into()))?;
    if entry.user_id != user_id {
        warn!(entry_id = log_id, owner = entry.user_id, user_id, "ownership mismatch");
        return Err(ApiError::Forbidden(
            "Consumption entry belongs to another user".into(),
        ));
    }

    let updated = ConsumptionEntry::update_servings(&state.db, log_id, serving_count)
        .await?
        .ok_or_else(|| ApiError::NotFound("Consumption entry not found".into()))?;
    info!(entry_id = log_id, serving_count, "consumption updated");
    Ok(Json(json!({ "consumption": updated })))
}

#[instrument(skip(state))]
pub async fn delete_consumption(
    State(state): State<AppState>,
    Path((user_id, log_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let entry = ConsumptionEntry::find(&state.db, log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Consumption entry not found".into()))?;
    if entry.user_id != user_id {
        warn!(entry_id = log_id, owner = entry.user_id, user_id, "ownership mismatch");
        return Err(ApiError::Forbidden(
            "Consumption entry belongs to another user".into(),
        ));
    }

    ConsumptionEntry::delete(&state.db, log_id).await?;
    info!(entry_id = log_id, user_id, "consumption deleted");
    Ok(Json(json!({ "message": "Consumption entry deleted" })))
}

#[instrument(skip(state))]
pub async fn consumption_today(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<TodayResponse>, ApiError> {
    let date = services::today_utc().to_string();
    let breakdown = ConsumptionEntry::daily_breakdown(&state.db, user_id, &date).await?;
    let total_caffeine_mg = breakdown.iter().map(|row| row.caffeine_mg).sum();
    Ok(Json(TodayResponse {
        date,
        total_caffeine_mg,
        breakdown,
    }))
}

/// Day-by-day totals for the trailing 7 calendar days, today included.
/// Dates without entries map to 0, so the object always has 7 keys.
#[instrument(skip(state))]
pub async fn consumption_weekly(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<BTreeMap<String, i64>>, ApiError> {
    let mut summary = BTreeMap::new();
    for date in services::trailing_week(services::today_utc()) {
        let date = date.to_string();
        let total = ConsumptionEntry::daily_total(&state.db, user_id, &date).await?;
        summary.insert(date, total);
    }
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<StatsResponse>, ApiError> {
    let user = User::find(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let date = services::today_utc().to_string();
    let total = ConsumptionEntry::daily_total(&state.db, user_id, &date).await?;

    Ok(Json(StatsResponse {
        user_id,
        daily_total_caffeine_mg: total,
        daily_limit_mg: user.daily_caffeine_limit,
        percentage_of_limit: services::percentage_of_limit(total, user.daily_caffeine_limit),
        remaining_mg: services::remaining_mg(user.daily_caffeine_limit, total),
    }))
}
