use serde::Deserialize;

use crate::coerce::{require, RawNumber};
use crate::error::ApiError;

/// Request body for beverage creation and full update.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeverageRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub caffeine_content_mg: Option<RawNumber>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Fully validated beverage payload.
#[derive(Debug)]
pub struct BeverageFields {
    pub name: String,
    pub caffeine_content_mg: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl BeverageRequest {
    pub fn validate(self) -> Result<BeverageFields, ApiError> {
        let name = require(self.name.filter(|n| !n.is_empty()), "name")?;
        let caffeine_content_mg = require(self.caffeine_content_mg, "caffeine_content_mg")?
            .as_int("caffeine_content_mg")?;
        if caffeine_content_mg < 0 {
            return Err(ApiError::BadRequest(
                "'caffeine_content_mg' must be non-negative".into(),
            ));
        }
        Ok(BeverageFields {
            name,
            caffeine_content_mg,
            image_url: self.image_url,
            category: self.category,
        })
    }
}
