use serde::Serialize;

use crate::coerce::{require, RawNumber};
use crate::error::ApiError;

use super::repo::BreakdownRow;

/// Request body for `POST /users/{id}/consumptions`.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConsumptionRequest {
    #[serde(default)]
    pub beverage_id: Option<RawNumber>,
    #[serde(default)]
    pub serving_count: Option<RawNumber>,
}

#[derive(Debug)]
pub struct NewConsumption {
    pub beverage_id: i64,
    pub serving_count: i64,
}

impl LogConsumptionRequest {
    pub fn validate(self) -> Result<NewConsumption, ApiError> {
        let beverage_id = require(self.beverage_id, "beverage_id")?.as_int("beverage_id")?;
        let serving_count = match self.serving_count {
            Some(raw) => raw.as_int("serving_count")?,
            None => 1,
        };
        if serving_count < 1 {
            return Err(ApiError::BadRequest("'serving_count' must be >= 1".into()));
        }
        Ok(NewConsumption {
            beverage_id,
            serving_count,
        })
    }
}

/// Request body for `PUT /users/{id}/consumptions/{log_id}`.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateConsumptionRequest {
    #[serde(default)]
    pub serving_count: Option<RawNumber>,
}

impl UpdateConsumptionRequest {
    pub fn validate(self) -> Result<i64, ApiError> {
        let serving_count =
            require(self.serving_count, "serving_count")?.as_int("serving_count")?;
        if serving_count < 1 {
            return Err(ApiError::BadRequest("'serving_count' must be >= 1".into()));
        }
        Ok(serving_count)
    }
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: String,
    pub total_caffeine_mg: i64,
    pub breakdown: Vec<BreakdownRow>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub user_id: i64,
    pub daily_total_caffeine_mg: i64,
    pub daily_limit_mg: i64,
    pub percentage_of_limit: f64,
    pub remaining_mg: i64,
}
