//! Provider status check, run before any field is read from a response.

use serde_json::Value;

use crate::error::WeatherError;

const STATUS_OK: i64 = 200;
const STATUS_NOT_FOUND: i64 = 404;

/// Fails when the body's `cod` field reports anything other than success.
///
/// The provider sends `cod` as a number on success and as a string on
/// errors. Both forms are accepted for every code, so `404` and `"200"` are
/// classified the same as `"404"` and `200`.
pub fn validate_response(data: &Value) -> Result<(), WeatherError> {
    match status_code(data) {
        Some(STATUS_OK) => Ok(()),
        Some(STATUS_NOT_FOUND) => Err(WeatherError::NotFound),
        _ => {
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("unknown error");
            Err(WeatherError::Provider {
                message: message.to_string(),
            })
        }
    }
}

fn status_code(data: &Value) -> Option<i64> {
    match data.get("cod")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
