use serde::Deserialize;

use crate::coerce::{require, RawNumber};
use crate::error::ApiError;

const DEFAULT_WEIGHT_LBS: f64 = 160.0;

/// Request body for user creation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub daily_caffeine_limit: Option<RawNumber>,
    #[serde(default)]
    pub weight_lbs: Option<RawNumber>,
}

/// Fully validated user-creation payload.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub daily_caffeine_limit: i64,
    pub weight_lbs: f64,
}

impl CreateUserRequest {
    /// Presence, then coercion, then range; the first failing check wins.
    /// All missing fields are reported in one message.
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let missing: Vec<&str> = [
            ("username", self.username.as_deref().unwrap_or("").is_empty()),
            ("email", self.email.as_deref().unwrap_or("").is_empty()),
            (
                "password_hash",
                self.password_hash.as_deref().unwrap_or("").is_empty(),
            ),
            ("daily_caffeine_limit", self.daily_caffeine_limit.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(field, _)| *field)
        .collect();
        if !missing.is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let daily_caffeine_limit = require(self.daily_caffeine_limit, "daily_caffeine_limit")?
            .as_int("daily_caffeine_limit")?;
        if daily_caffeine_limit <= 0 {
            return Err(ApiError::BadRequest(
                "'daily_caffeine_limit' must be > 0".into(),
            ));
        }

        let weight_lbs = match self.weight_lbs {
            Some(raw) => raw.as_float("weight_lbs")?,
            None => DEFAULT_WEIGHT_LBS,
        };
        if weight_lbs <= 0.0 {
            return Err(ApiError::BadRequest("'weight_lbs' must be > 0".into()));
        }

        Ok(NewUser {
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password_hash: self.password_hash.unwrap_or_default(),
            daily_caffeine_limit,
            weight_lbs,
        })
    }
}

/// Request body for `PUT /users/{id}/limit`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLimitRequest {
    #[serde(default)]
    pub daily_caffeine_limit: Option<RawNumber>,
}

impl UpdateLimitRequest {
    pub fn validate(self) -> Result<i64, ApiError> {
        let limit = require(self.daily_caffeine_limit, "daily_caffeine_limit")?
            .as_int("daily_caffeine_limit")?;
        if limit <= 0 {
            return Err(ApiError::BadRequest(
                "'daily_caffeine_limit' must be > 0".into(),
            ));
        }
        Ok(limit)
    }
}
