// Error taxonomy for dashboard retrieval and rendering
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AsideError {
    /// Dashboard server unreachable, timed out, rejected the login or answered non-2xx
    #[error("dashboard connection failed: {0}")]
    Connection(String),

    /// Response body is not JSON or lacks an expected field/index
    #[error("malformed dashboard response: {0}")]
    MalformedResponse(String),

    /// Missing host or credentials
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl From<reqwest::Error> for AsideError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AsideError::MalformedResponse(e.to_string())
        } else {
            AsideError::Connection(e.to_string())
        }
    }
}

/// Extract `result[0].data[0].count` from a chart-data response
pub fn total_events(response: &Value) -> Result<i64, AsideError> {
    let result = response
        .get("result")
        .and_then(Value::as_array)
        .ok_or_else(|| AsideError::MalformedResponse("missing `result` list".to_string()))?;
    let first = result
        .first()
        .ok_or_else(|| AsideError::MalformedResponse("`result` is empty".to_string()))?;
    let row = first
        .get("data")
        .and_then(Value::as_array)
        .and_then(|rows| rows.first())
        .ok_or_else(|| AsideError::MalformedResponse("missing `result[0].data[0]`".to_string()))?;

    row.get("count")
        .and_then(Value::as_i64)
        .ok_or_else(|| AsideError::MalformedResponse("missing integer `count`".to_string()))
}
