use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

use super::dto::BeverageRequest;
use super::repo::Beverage;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/beverages", get(list_beverages).post(create_beverage))
        .route("/beverages/:id", put(update_beverage).delete(delete_beverage))
}

#[instrument(skip(state))]
pub async fn list_beverages(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let beverages = Beverage::list(&state.db).await?;
    Ok(Json(json!({ "beverages": beverages })))
}

#[instrument(skip(state, payload))]
pub async fn create_beverage(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BeverageRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let fields = payload.validate()?;
    let beverage = Beverage::create(&state.db, &fields).await?;
    info!(beverage_id = beverage.id, name = %beverage.name, "beverage created");
    Ok((StatusCode::CREATED, Json(json!({ "beverage": beverage }))))
}

#[instrument(skip(state, payload))]
pub async fn update_beverage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<BeverageRequest>,
) -> Result<Json<Value>, ApiError> {
    if Beverage::find(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Beverage not found".into()));
    }
    let fields = payload.validate()?;
    let beverage = Beverage::update(&state.db, id, &fields)
        .await?
        .ok_or_else(|| ApiError::NotFound("Beverage not found".into()))?;
    info!(beverage_id = id, "beverage updated");
    Ok(Json(json!({ "beverage": beverage })))
}

/// No referential check: consumption entries pointing at the deleted
/// beverage stay behind and simply stop contributing to aggregates.
#[instrument(skip(state))]
pub async fn delete_beverage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let removed = Beverage::delete(&state.db, id).await?;
    info!(beverage_id = id, removed, "beverage deleted");
    Ok(Json(json!({ "message": "Beverage deleted" })))
}
