use serde::Deserialize;

use crate::error::ApiError;

/// A numeric request field as the client sent it. Clients of the original
/// API sent numbers and numeric strings interchangeably, so the schema
/// accepts both and endpoints coerce explicitly, naming the field on failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    pub fn as_int(&self, field: &str) -> Result<i64, ApiError> {
        let invalid = || ApiError::BadRequest(format!("'{field}' must be an integer"));
        match self {
            RawNumber::Int(v) => Ok(*v),
            RawNumber::Float(v) if v.fract() == 0.0 => Ok(*v as i64),
            RawNumber::Float(_) => Err(invalid()),
            RawNumber::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        }
    }

    pub fn as_float(&self, field: &str) -> Result<f64, ApiError> {
        match self {
            RawNumber::Int(v) => Ok(*v as f64),
            RawNumber::Float(v) => Ok(*v),
            RawNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ApiError::BadRequest(format!("'{field}' must be a number"))),
        }
    }
}

/// Presence check shared by the write endpoints; the error names the field.
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Field '{field}' is required")))
}
