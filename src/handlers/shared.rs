use actix_web::{HttpResponse, http::StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: &str) -> Self {
        Self {
            error: kind.to_string(),
            message: message.to_string(),
        }
    }
}

/// Serialises `body` up front so an encoding failure becomes a 500 instead of
/// a truncated response.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<HttpResponse, AppError> {
    let bytes = serde_json::to_vec(body)?;

    Ok(HttpResponse::build(status)
        .content_type("application/json")
        .body(bytes))
}

/// Decodes a request body into `T`, accepting only a JSON object. serde's
/// derived struct visitor would otherwise take a positional array too.
pub fn decode_object<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    if !body.is_object() {
        return Err(AppError::Validation(format!(
            "expected a JSON object, found {}",
            json_kind(&body)
        )));
    }

    serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
